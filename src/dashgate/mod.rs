//! HTTP surface: router, protected-route gate, and server bootstrap.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Extension, Request},
    http::{header::SET_COOKIE, HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod config;
pub mod crawler;
pub mod exchange;
pub mod handlers;
pub mod session;

use config::Config;
use session::{CurrentUser, Sessions};

use crate::store::{CredentialStore, RedisStore};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::auth::auth,
        handlers::root::root,
        handlers::app::app,
        handlers::logout::logout,
    ),
    tags(
        (name = "auth", description = "One-time token exchange and session lifecycle"),
        (name = "dashgate", description = "Dashboard gateway surface"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Start the gateway: connect to the credential store and serve until
/// shutdown.
///
/// # Errors
/// Returns an error if the store connection or the listener fails.
pub async fn new(port: u16, config: Config) -> Result<()> {
    let store = RedisStore::connect(config.store_address())
        .await
        .context("Failed to connect to the credential store")?;
    let sessions = Sessions::new(&config);

    let app = router(Arc::new(store), sessions);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Build the router. Separate from [`new`] so tests can drive the full HTTP
/// surface against an in-memory store.
#[must_use]
pub fn router(store: Arc<dyn CredentialStore>, sessions: Sessions) -> Router {
    // Everything under /app sits behind the gate; pages added later inherit
    // it instead of re-checking per handler.
    let protected = Router::new()
        .route("/", get(handlers::app))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .route("/", get(handlers::root))
        .route("/auth", get(handlers::auth))
        .route("/logout", post(handlers::logout))
        .nest("/app", protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(store))
                .layer(Extension(sessions)),
        )
        .route("/health", get(handlers::health).options(handlers::health))
}

/// The protected-route gate. Runs before any dashboard logic: resolves the
/// session (applying admin bypass when configured) and bounces sessionless
/// browsers back to the landing view.
async fn require_session(
    Extension(sessions): Extension<Sessions>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some((session, new_cookie)) = sessions.resolve(request.headers()) else {
        debug!("No session on protected route, redirecting to landing view");
        return handlers::redirect_found("/");
    };

    request.extensions_mut().insert(CurrentUser(session));
    let mut response = next.run(request).await;
    if let Some(cookie) = new_cookie {
        // First touch under admin bypass: hand the browser its new session.
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
