//! This module defines the REST API's routes and their handlers.
//!
//! Handlers are thin: they parse the request, hand it to the matching
//! [use case](crate::use_cases), and translate the result into a JSON
//! response.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState,
    auth::auth_guard,
    stores::{TransactionStore, UserStore},
};

pub mod endpoints;

mod log_in;
mod register;
mod report;
mod transaction;
mod user;

/// Return a router with all the app's routes.
///
/// Everything except registration and log-in sits behind the
/// [auth_guard] middleware.
pub fn build_router<T, U>(state: AppState<T, U>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    // Log-out is deliberately unprotected: invalidating the cookie must work
    // even for sessions that have already expired, and the auth middleware
    // would re-issue the cookie it just invalidated.
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN, post(log_in::post_log_in::<T, U>))
        .route(endpoints::LOG_OUT, post(log_in::post_log_out))
        .route(endpoints::USERS, post(register::create_user::<T, U>));

    let protected_routes = Router::new()
        .route(endpoints::USERS, get(user::get_users::<T, U>))
        .route(
            endpoints::USER,
            get(user::get_user::<T, U>).put(user::put_user::<T, U>),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(transaction::get_transactions::<T, U>)
                .post(transaction::create_transaction::<T, U>),
        )
        .route(
            endpoints::TRANSACTION,
            put(transaction::put_transaction::<T, U>)
                .delete(transaction::delete_transaction::<T, U>),
        )
        .route(
            endpoints::FINANCIAL_REPORT,
            get(report::get_financial_report::<T, U>),
        )
        .route(endpoints::CSV_REPORT, get(report::get_csv_report::<T, U>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_guard::<T, U>,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Unknown routes get the same JSON error shape as everything else.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}
