//! This file defines the route handlers for listing, recording, editing, and
//! deleting transactions.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    models::{DatabaseID, User},
    stores::{TransactionStore, TransactionUpdate, UserStore},
    use_cases::{TransactionData, TransactionUseCases},
};

/// A route handler for listing all transactions in the ledger.
pub async fn get_transactions<T, U>(
    State(state): State<AppState<T, U>>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let transactions = TransactionUseCases::new(state.transaction_store).get_all_transactions()?;

    Ok(Json(transactions))
}

/// A route handler for recording a new transaction owned by the current user.
///
/// Returns the status code 400 if the amount or description is invalid.
pub async fn create_transaction<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
    Json(data): Json<TransactionData>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let transaction = TransactionUseCases::new(state.transaction_store)
        .create_transaction(data, &current_user)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for updating a transaction.
///
/// Returns the status code 404 if the transaction does not exist and 403 if
/// the current user neither owns it nor is an administrator.
pub async fn put_transaction<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
    Path(transaction_id): Path<DatabaseID>,
    Json(update): Json<TransactionUpdate>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let transaction = TransactionUseCases::new(state.transaction_store).update_transaction(
        transaction_id,
        update,
        &current_user,
    )?;

    Ok(Json(transaction))
}

/// A route handler for deleting a transaction.
///
/// Returns the status code 404 if the transaction does not exist and 403 if
/// the current user neither owns it nor is an administrator.
pub async fn delete_transaction<T, U>(
    State(state): State<AppState<T, U>>,
    Extension(current_user): Extension<User>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    TransactionUseCases::new(state.transaction_store)
        .delete_transaction(transaction_id, &current_user)?;

    Ok(StatusCode::NO_CONTENT)
}
