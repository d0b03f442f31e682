//! This file defines the log-in and log-out route handlers.
//! The auth module handles the lower level credential and cookie logic.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    auth::{LogInData, invalidate_auth_cookie, set_auth_cookie, verify_credentials},
    stores::{TransactionStore, UserStore},
};

/// Handler for log-in requests.
///
/// On success the auth cookie is set and the logged-in user is returned as
/// JSON.
///
/// # Errors
///
/// Returns a 401 response if the email does not belong to a registered user
/// or the password is not correct, and a 500 response if an internal error
/// occurred while verifying the password.
pub async fn post_log_in<T, U>(
    State(state): State<AppState<T, U>>,
    jar: PrivateCookieJar,
    Json(credentials): Json<LogInData>,
) -> Result<impl IntoResponse, Error>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    let user = verify_credentials(credentials, &state.user_store)?;

    let jar = set_auth_cookie(jar, user.id(), state.cookie_duration);

    Ok((jar, Json(user)))
}

/// Handler for log-out requests.
///
/// Invalidates the auth cookie. The client is expected to drop the session
/// regardless of the response.
pub async fn post_log_out(jar: PrivateCookieJar) -> impl IntoResponse {
    (invalidate_auth_cookie(jar), StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod log_in_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        auth::COOKIE_USER_ID,
        build_router,
        routes::endpoints,
        test_utils::{TEST_PASSWORD, get_test_state, sign_up},
    };

    fn get_test_server() -> TestServer {
        TestServer::new(build_router(get_test_state()))
    }

    #[tokio::test]
    async fn log_in_succeeds_with_correct_credentials() {
        let server = get_test_server();
        sign_up(&server, "test@test.com").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "test@test.com", "password": TEST_PASSWORD }))
            .await;

        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["email"], "test@test.com");
        assert!(body.get("password_hash").is_none());

        let cookie = response.cookie(COOKIE_USER_ID);
        assert!(!cookie.value().is_empty());
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();
        sign_up(&server, "test@test.com").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "test@test.com", "password": "wrongpassword" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": "nobody@test.com", "password": TEST_PASSWORD }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_out_invalidates_the_auth_cookie() {
        let server = get_test_server();
        let cookie = sign_up(&server, "test@test.com").await;

        let response = server
            .post(endpoints::LOG_OUT)
            .add_cookie(cookie)
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
        let cleared_cookie = response.cookie(COOKIE_USER_ID);
        assert_eq!(cleared_cookie.value(), "deleted");
    }
}
