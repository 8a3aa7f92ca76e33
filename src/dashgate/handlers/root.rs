//! Unauthenticated landing view.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::dashgate::{handlers::redirect_found, session::Sessions};

const LANDING_BODY: &str =
    "Your sign-in link is missing or has expired. Request a fresh link from the bot to open the dashboard.";

/// `/`: authenticated browsers go straight to the dashboard, everyone else
/// sees instructions for obtaining a fresh link.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 302, description = "Authenticated, redirect to the dashboard"),
        (status = 200, description = "Landing view for browsers without a session", body = String),
    ),
    tag = "dashgate",
)]
pub async fn root(Extension(sessions): Extension<Sessions>, headers: HeaderMap) -> Response {
    match sessions.resolve(&headers) {
        Some((session, new_cookie)) => {
            debug!(user_id = %session.user_id, "Authenticated browser on /, redirecting");
            let mut response = redirect_found("/app");
            if let Some(cookie) = new_cookie {
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
            response
        }
        None => (StatusCode::OK, LANDING_BODY).into_response(),
    }
}
