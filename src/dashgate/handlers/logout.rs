//! Session invalidation.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::dashgate::{handlers::redirect_found, session::Sessions};

/// `POST /logout`: clears the session cookie and returns to the landing view.
/// Always clears, even if the browser held no session to begin with.
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 302, description = "Session cookie cleared, redirect to the landing view"),
    ),
    tag = "auth",
)]
pub async fn logout(Extension(sessions): Extension<Sessions>) -> Response {
    match sessions.clear_cookie() {
        Ok(cookie) => {
            let mut response = redirect_found("/");
            response.headers_mut().insert(SET_COOKIE, cookie);
            response
        }
        Err(err) => {
            error!("Failed to build clearing cookie: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
