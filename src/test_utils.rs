//! Helpers shared by the test modules across the crate.

use std::sync::{Arc, Mutex};

use axum::{http::header::SET_COOKIE, response::IntoResponse};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState,
    auth::{COOKIE_USER_ID, set_auth_cookie},
    db::initialize,
    models::UserID,
    routes::endpoints,
    stores::sqlite::{SQLiteTransactionStore, SQLiteUserStore},
};

/// The concrete state type used by tests: SQLite stores over a shared
/// in-memory database.
pub(crate) type TestState = AppState<SQLiteTransactionStore, SQLiteUserStore>;

pub(crate) const TEST_COOKIE_SECRET: &str = "wowomgsosecret";

/// A password that satisfies the registration strength check.
pub(crate) const TEST_PASSWORD: &str = "correcthorsebatterystaple";

/// Fresh SQLite stores sharing one in-memory database.
pub(crate) fn get_test_stores() -> (SQLiteTransactionStore, SQLiteUserStore) {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&conn).expect("Could not initialize database.");
    let connection = Arc::new(Mutex::new(conn));

    (
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    )
}

/// App state over a fresh in-memory database.
pub(crate) fn get_test_state() -> TestState {
    let (transaction_store, user_store) = get_test_stores();

    AppState::new(TEST_COOKIE_SECRET, transaction_store, user_store)
}

/// Register a user through the API and return their auth cookie.
///
/// The first user registered this way becomes the administrator.
pub(crate) async fn sign_up(server: &TestServer, email: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::USERS)
        .json(&json!({ "email": email, "password": TEST_PASSWORD }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    response.cookie(COOKIE_USER_ID)
}

/// Build the encrypted auth cookie for `user_id` directly, bypassing the
/// log-in route. Useful for driving the auth middleware on its own.
pub(crate) fn encrypted_auth_cookie(state: &TestState, user_id: UserID) -> Cookie<'static> {
    let jar = PrivateCookieJar::new(state.cookie_key.clone());
    let jar = set_auth_cookie(jar, user_id, state.cookie_duration);

    let header = jar
        .into_response()
        .headers()
        .get(SET_COOKIE)
        .expect("expected a set-cookie header")
        .to_str()
        .expect("expected a valid set-cookie header")
        .to_string();

    Cookie::parse(header)
        .expect("could not parse the set-cookie header")
        .into_owned()
}
