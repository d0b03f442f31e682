//! This file defines the registration route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::set_auth_cookie,
    models::{PasswordHash, UserRole, ValidatedPassword},
    stores::{TransactionStore, UserStore},
};

/// The data sent to register a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterData {
    /// The email to register with. Must not belong to an existing user.
    pub email: EmailAddress,
    /// The password to register with. Checked for strength before hashing.
    pub password: String,
}

/// Handler for registering a new user.
///
/// The very first registered user becomes the administrator, everybody after
/// that gets the regular user role and is managed by the administrator.
///
/// On success the auth cookie is set (registering logs the user in) and the
/// new user is returned as JSON with status 201.
///
/// # Errors
///
/// Returns a 400 response if the password is too weak, a 409 response if the
/// email is already registered, and a 500 response if hashing or the store
/// fails.
pub async fn create_user<T, U>(
    State(state): State<AppState<T, U>>,
    jar: PrivateCookieJar,
    Json(register_data): Json<RegisterData>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let mut user_store = state.user_store;

    let password = ValidatedPassword::new(&register_data.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let role = if user_store.count()? == 0 {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let user = user_store.create(register_data.email, password_hash, role)?;

    let jar = set_auth_cookie(jar, user.id(), state.cookie_duration);

    Ok((StatusCode::CREATED, jar, Json(user)))
}
