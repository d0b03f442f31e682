//! Authentication middleware that validates the session cookie, loads the
//! current user, and keeps the session alive.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, Error,
    auth::cookie::{get_user_id_from_auth_cookie, set_auth_cookie},
    stores::{TransactionStore, UserStore},
};

/// Middleware function that checks for a valid authorization cookie.
///
/// The current [User](crate::models::User) is loaded from the user store and
/// placed into the request, then the request is executed normally. If the
/// cookie is missing, invalid, or refers to a user that no longer exists, a
/// 401 JSON response is returned instead.
///
/// On the way out the auth cookie is re-issued so that the session expiry
/// slides forward with activity.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(user): Extension<User>` to receive the current user.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key`
/// for decrypting and verifying the cookie contents.
pub async fn auth_guard<T, U>(
    State(state): State<AppState<T, U>>,
    request: Request,
    next: Next,
) -> Response
where
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar from request parts: {err:?}");
            return Error::NotAuthenticated.into_response();
        }
    };

    let user_id = match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    // A valid cookie for a deleted user is treated the same as no cookie.
    let user = match state.user_store.get(user_id) {
        Ok(user) => user,
        Err(_) => return Error::NotAuthenticated.into_response(),
    };

    parts.extensions.insert(user);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let jar = set_auth_cookie(jar, user_id, state.cookie_duration);

    let (mut parts, body) = response.into_parts();
    for (key, value) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, value.to_owned());
    }

    Response::from_parts(parts, body)
}
