//! This file defines the route handlers for listing, viewing, and editing
//! user accounts.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    models::{User, UserID},
    stores::{TransactionStore, UserStore, UserUpdate},
    use_cases::UserUseCases,
};

/// A route handler for listing all registered users.
///
/// Returns the status code 403 if the current user is not an administrator.
pub async fn get_users<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let users = UserUseCases::new(state.user_store).get_all_users(&current_user)?;

    Ok(Json(users))
}

/// A route handler for fetching a single user.
///
/// A user may fetch their own profile, administrators may fetch any profile.
/// Returns the status code 404 if the user does not exist.
pub async fn get_user<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = UserUseCases::new(state.user_store).get_user(UserID::new(user_id), &current_user)?;

    Ok(Json(user))
}

/// A route handler for updating a user's name, phone number, or role.
///
/// Returns the status code 403 if the current user is not an administrator
/// and 404 if the user does not exist.
pub async fn put_user<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = UserUseCases::new(state.user_store).update_user(
        UserID::new(user_id),
        update,
        &current_user,
    )?;

    Ok(Json(user))
}
