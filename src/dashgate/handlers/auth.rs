//! The `/auth` endpoint: exchanges a one-time token for a browser session.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use utoipa::IntoParams;

use crate::dashgate::{
    crawler::is_probable_crawler,
    exchange::{self, ExchangeError},
    handlers::{redirect_found, request_user_agent},
    session::Sessions,
};
use crate::store::CredentialStore;

#[derive(IntoParams, Debug, Deserialize, Default)]
#[into_params(parameter_in = Query)]
pub struct AuthArgs {
    /// One-time token issued out-of-band by the bot.
    token: Option<String>,
}

#[utoipa::path(
    get,
    path = "/auth",
    params(AuthArgs),
    responses(
        (status = 302, description = "Token redeemed, session established, redirect to the dashboard"),
        (status = 200, description = "Link-preview crawler screened off, token untouched", body = String),
        (status = 400, description = "Token not provided", body = String),
        (status = 401, description = "Invalid or expired sign-in link", body = String),
    ),
    tag = "auth",
)]
#[instrument(skip(store, sessions, headers, query))]
pub async fn auth(
    Extension(store): Extension<Arc<dyn CredentialStore>>,
    Extension(sessions): Extension<Sessions>,
    headers: HeaderMap,
    query: Result<Query<AuthArgs>, QueryRejection>,
) -> Response {
    // Screen crawlers before anything else so a preview fetch can never
    // consume the token meant for the human behind it.
    let user_agent = request_user_agent(&headers);
    if is_probable_crawler(user_agent) {
        warn!(user_agent, "Link-preview crawler on /auth, skipping redemption");
        return (StatusCode::OK, "Link preview").into_response();
    }

    let token = parse_token(query);

    match exchange::redeem(store.as_ref(), &token).await {
        Ok(user_id) => {
            // A browser that already holds a session gets it overwritten by
            // the fresh link's identity.
            if let Some(existing) = sessions.current(&headers) {
                if existing.user_id != user_id {
                    info!("Existing session identity replaced by a fresh sign-in link");
                }
            }
            establish_and_redirect(&sessions, &user_id)
        }
        Err(ExchangeError::MissingToken) => {
            warn!("Authentication request without a token");
            (StatusCode::BAD_REQUEST, "Token not provided").into_response()
        }
        Err(_) => {
            // Never issued, replayed, expired, or store trouble: one message.
            (StatusCode::UNAUTHORIZED, "Invalid or expired sign-in link").into_response()
        }
    }
}

fn parse_token(query: Result<Query<AuthArgs>, QueryRejection>) -> String {
    query
        .map(|Query(args)| args.token.unwrap_or_default())
        .unwrap_or_default()
}

fn establish_and_redirect(sessions: &Sessions, user_id: &str) -> Response {
    match sessions.establish(user_id) {
        Ok((session, cookie)) => {
            info!(user_id = %session.user_id, "Session established, redirecting to dashboard");
            let mut response = redirect_found("/app");
            response.headers_mut().insert(SET_COOKIE, cookie);
            response
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashgate::config::Config;
    use crate::store::{token_key, MemoryStore};
    use axum::http::{
        header::{COOKIE, LOCATION, USER_AGENT},
        HeaderValue, Uri,
    };
    use secrecy::SecretString;
    use std::time::Duration;

    fn sessions() -> Sessions {
        Sessions::new(&Config::new(
            "redis://127.0.0.1:6379/0".to_string(),
            SecretString::from("handler-test-key".to_string()),
        ))
    }

    fn query_with(token: &str) -> Result<Query<AuthArgs>, QueryRejection> {
        Ok(Query(AuthArgs {
            token: Some(token.to_string()),
        }))
    }

    async fn seeded_store(token: &str, user_id: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put(&token_key(token), user_id, Duration::from_secs(60))
            .await
            .expect("seed failed");
        store
    }

    #[tokio::test]
    async fn valid_token_redirects_with_session_cookie() {
        let store = seeded_store("tok", "555").await;
        let response = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions()),
            HeaderMap::new(),
            query_with("tok"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/app")
        );
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("session cookie set");
        assert!(cookie.starts_with("dashgate_session="));

        // The token was consumed by the same request.
        assert_eq!(
            store.get(&token_key("tok")).await.expect("get failed"),
            None
        );
    }

    #[tokio::test]
    async fn replayed_token_is_unauthorized() {
        let store = seeded_store("tok", "555").await;
        let sessions = sessions();

        let first = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions.clone()),
            HeaderMap::new(),
            query_with("tok"),
        )
        .await;
        assert_eq!(first.status(), StatusCode::FOUND);

        let second = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions),
            HeaderMap::new(),
            query_with("tok"),
        )
        .await;
        assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_is_bad_request_with_zero_store_access() {
        let store = Arc::new(MemoryStore::new());
        let uri: Uri = "http://dashgate.test/auth".parse().expect("valid uri");
        let query = Query::<AuthArgs>::try_from_uri(&uri);

        let response = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions()),
            HeaderMap::new(),
            query,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn empty_token_is_bad_request() {
        let store = Arc::new(MemoryStore::new());
        let response = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions()),
            HeaderMap::new(),
            query_with(""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn crawler_gets_neutral_200_and_token_survives() {
        let store = seeded_store("tok", "555").await;
        let seed_calls = store.calls();

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("TelegramBot (like TwitterBot)"),
        );

        let response = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions()),
            headers,
            query_with("tok"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        // No store access at all during the crawler request.
        assert_eq!(store.calls(), seed_calls);
        assert_eq!(
            store
                .get(&token_key("tok"))
                .await
                .expect("get failed")
                .as_deref(),
            Some("555")
        );
    }

    #[tokio::test]
    async fn fresh_token_overwrites_an_existing_session() {
        let store = seeded_store("tok-b", "bob").await;
        let sessions = sessions();

        let (_, alice_cookie) = sessions.establish("alice").expect("establish failed");
        let pair = alice_cookie
            .to_str()
            .expect("ascii")
            .split(';')
            .next()
            .expect("pair")
            .to_string();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&pair).expect("valid header"));

        let response = auth(
            Extension(Arc::clone(&store) as Arc<dyn CredentialStore>),
            Extension(sessions.clone()),
            headers,
            query_with("tok-b"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let new_pair = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("cookie set")
            .split(';')
            .next()
            .expect("pair")
            .to_string();
        let mut replayed = HeaderMap::new();
        replayed.insert(COOKIE, HeaderValue::from_str(&new_pair).expect("valid"));
        assert_eq!(
            sessions.current(&replayed).map(|s| s.user_id),
            Some("bob".to_string())
        );
    }
}
