//! Defines the user store trait, the port that the application layer uses to
//! create and retrieve [User] objects.

use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error,
    models::{PasswordHash, User, UserID, UserRole},
};

/// Handles the creation and retrieval of [User] objects.
pub trait UserStore {
    /// Create a new user with no display name or phone number.
    ///
    /// Returns [Error::DuplicateEmail] if a user with `email` already exists.
    fn create(
        &mut self,
        email: EmailAddress,
        password_hash: PasswordHash,
        role: UserRole,
    ) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get a user by their email.
    ///
    /// Returns [Error::NotFound] if no user with the given email exists.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;

    /// Get all users, in the order they registered.
    fn get_all(&self) -> Result<Vec<User>, Error>;

    /// Apply `update` to the user with the given ID and return the updated
    /// user.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn update(&mut self, id: UserID, update: UserUpdate) -> Result<User, Error>;

    /// The number of registered users.
    fn count(&self) -> Result<i64, Error>;
}

/// A partial update to a user's profile. Fields set to `None` are left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new phone number.
    pub phone: Option<String>,
    /// The new role.
    pub role: Option<UserRole>,
}
