//! User authentication: credential verification, the session cookie, and the
//! middleware that guards protected routes.

mod cookie;
mod middleware;

pub(crate) use cookie::{
    COOKIE_USER_ID, get_user_id_from_auth_cookie, invalidate_auth_cookie, set_auth_cookie,
};
pub use cookie::DEFAULT_COOKIE_DURATION;
pub use middleware::auth_guard;

use email_address::EmailAddress;
use serde::Deserialize;

use crate::{Error, models::User, stores::UserStore};

/// The credentials a user logs in with.
#[derive(Debug, Clone, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: EmailAddress,
    /// Password entered during log-in.
    pub password: String,
}

/// Check `credentials` against the stored password hash and return the
/// matching user.
///
/// # Errors
///
/// Returns an:
/// - [Error::InvalidCredentials] if the email does not belong to a registered
///   user or the password does not match,
/// - [Error::HashingError] if the hashing library fails.
///
/// An unknown email and a wrong password produce the same error so that the
/// response does not reveal which emails are registered.
pub fn verify_credentials<U>(credentials: LogInData, user_store: &U) -> Result<User, Error>
where
    U: UserStore,
{
    let user = user_store
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&credentials.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}
