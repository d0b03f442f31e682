//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{PasswordHash, User, UserID, UserRole},
    stores::{UserStore, UserUpdate},
};

/// Stores users in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create and insert a new user into the database.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns an [Error::DuplicateEmail] if `email` is already registered,
    /// or an [Error::SqlError] if an SQL related error occurred.
    fn create(
        &mut self,
        email: EmailAddress,
        password_hash: PasswordHash,
        role: UserRole,
    ) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user (email, role, password) VALUES (?1, ?2, ?3)",
            (&email.to_string(), role, password_hash.to_string()),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(id, email, None, None, role, password_hash))
    }

    /// Get the user from the database that has the specified `id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no user with the specified
    /// `id` or an [Error::SqlError] if there are SQL related errors.
    fn get(&self, id: UserID) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, name, phone, role, password FROM user WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Get the user from the database that has the specified `email` address.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no user with the specified
    /// email or an [Error::SqlError] if there are SQL related errors.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, email, name, phone, role, password FROM user WHERE email = :email",
            )?
            .query_row(&[(":email", &email.to_string())], Self::map_row)
            .map_err(|e| e.into())
    }

    /// Get all users in registration order.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SqlError] if there are SQL related errors.
    fn get_all(&self) -> Result<Vec<User>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, name, phone, role, password FROM user ORDER BY id ASC")?
            .query_map((), Self::map_row)?
            .map(|maybe_user| maybe_user.map_err(Error::SqlError))
            .collect()
    }

    /// Apply `update` to the user with the specified `id`.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NotFound] if there is no user with the specified
    /// `id` or an [Error::SqlError] if there are SQL related errors.
    fn update(&mut self, id: UserID, update: UserUpdate) -> Result<User, Error> {
        let existing = self.get(id)?;

        let name = update.name.or_else(|| existing.name().map(String::from));
        let phone = update.phone.or_else(|| existing.phone().map(String::from));
        let role = update.role.unwrap_or(existing.role());

        self.connection.lock().unwrap().execute(
            "UPDATE user SET name = ?1, phone = ?2, role = ?3 WHERE id = ?4",
            (&name, &phone, role, id.as_i64()),
        )?;

        Ok(User::new(
            id,
            existing.email().clone(),
            name,
            phone,
            role,
            existing.password_hash().clone(),
        ))
    }

    /// The number of registered users.
    ///
    /// # Panics
    ///
    /// Panics if the database lock is already acquired by the same thread or is poisoned.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SqlError] if there are SQL related errors.
    fn count(&self) -> Result<i64, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM user", (), |row| row.get(0))
            .map_err(|e| e.into())
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL,
                    name TEXT,
                    phone TEXT,
                    role TEXT NOT NULL,
                    password TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_email: String = row.get(offset + 1)?;
        let name: Option<String> = row.get(offset + 2)?;
        let phone: Option<String> = row.get(offset + 3)?;
        let role: UserRole = row.get(offset + 4)?;
        let raw_password_hash: String = row.get(offset + 5)?;

        let id = UserID::new(raw_id);
        let email = EmailAddress::new_unchecked(raw_email);
        let password_hash = PasswordHash::new_unchecked(&raw_password_hash);

        Ok(User::new(id, email, name, phone, role, password_hash))
    }
}
