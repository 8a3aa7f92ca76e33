pub mod health;
pub use self::health::health;

pub mod auth;
pub use self::auth::auth;

pub mod root;
pub use self::root::root;

pub mod app;
pub use self::app::app;

pub mod logout;
pub use self::logout::logout;

// common helpers for the handlers
use axum::{
    http::{header::LOCATION, header::USER_AGENT, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// `302 Found` redirect, the status browsers expect after the exchange.
pub(crate) fn redirect_found(location: &'static str) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, HeaderValue::from_static(location))],
    )
        .into_response()
}

pub(crate) fn request_user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_found_sets_status_and_location() {
        let response = redirect_found("/app");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION).map(|v| v.to_str().ok()),
            Some(Some("/app"))
        );
    }

    #[test]
    fn request_user_agent_defaults_to_empty() {
        assert_eq!(request_user_agent(&HeaderMap::new()), "");

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.4.0"));
        assert_eq!(request_user_agent(&headers), "curl/8.4.0");
    }
}
