//! Use cases for viewing and managing user accounts.

use crate::{
    Error,
    models::{User, UserID},
    stores::{UserStore, UserUpdate},
};

/// Implements the user management use cases.
///
/// Permission rules:
/// - listing and editing users requires
///   [can_manage_users](User::can_manage_users),
/// - a user may always view their own profile, administrators may view any
///   profile.
pub struct UserUseCases<U> {
    user_store: U,
}

impl<U> UserUseCases<U>
where
    U: UserStore,
{
    /// Create the use cases over `user_store`.
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    /// All registered users, in registration order.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::Forbidden] if `current_user` may not manage users,
    /// - [Error::SqlError] if the store fails.
    pub fn get_all_users(&self, current_user: &User) -> Result<Vec<User>, Error> {
        if !current_user.can_manage_users() {
            return Err(Error::Forbidden(
                "only administrators may manage users".to_string(),
            ));
        }

        self.user_store.get_all()
    }

    /// The user with the given `id`.
    ///
    /// A user may view their own profile, administrators may view any profile.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::Forbidden] if `current_user` requests another user's profile
    ///   and is not an administrator,
    /// - [Error::NotFound] if the user does not exist,
    /// - [Error::SqlError] if the store fails.
    pub fn get_user(&self, id: UserID, current_user: &User) -> Result<User, Error> {
        if current_user.id() != id && !current_user.is_admin() {
            return Err(Error::Forbidden(
                "you do not have permission to view this user".to_string(),
            ));
        }

        self.user_store.get(id)
    }

    /// Apply `update` to the user with the given `id`.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::Forbidden] if `current_user` may not manage users,
    /// - [Error::NotFound] if the user does not exist,
    /// - [Error::SqlError] if the store fails.
    pub fn update_user(
        &mut self,
        id: UserID,
        update: UserUpdate,
        current_user: &User,
    ) -> Result<User, Error> {
        if !current_user.can_manage_users() {
            return Err(Error::Forbidden(
                "only administrators may edit users".to_string(),
            ));
        }

        self.user_store.update(id, update)
    }
}
