//! This file defines a user of the application, their role, and the
//! permission checks that the application layer runs against them.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a raw database row ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying row ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The role a user holds within the application.
///
/// Serialized as `"USER"`/`"ADMIN"` both on the wire and in the database.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// A regular user: records transactions and manages their own profile.
    User,
    /// An administrator: additionally manages users and views reports.
    Admin,
}

impl UserRole {
    /// The canonical string form, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for UserRole {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for UserRole {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A user of the application.
///
/// Users are created by the [UserStore](crate::stores::UserStore) and retrieved
/// by ID or email. The password hash is kept internal and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserID,
    email: EmailAddress,
    name: Option<String>,
    phone: Option<String>,
    role: UserRole,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from its parts.
    ///
    /// This does not persist anything, see
    /// [UserStore::create](crate::stores::UserStore::create).
    pub fn new(
        id: UserID,
        email: EmailAddress,
        name: Option<String>,
        phone: Option<String>,
        role: UserRole,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            email,
            name,
            phone,
            role,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's display name, if they have set one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The user's phone number, if they have set one.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// The user's role.
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the user holds the administrator role.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether the user may list and edit other user accounts.
    pub fn can_manage_users(&self) -> bool {
        self.is_admin()
    }

    /// Whether the user may view consolidated financial reports.
    pub fn can_view_reports(&self) -> bool {
        self.is_admin()
    }
}
