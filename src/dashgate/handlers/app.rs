//! Protected dashboard root.
//!
//! The actual pages (purchase tables, charts) live in the dashboard frontend
//! and are not this service's concern; this handler exposes the identity the
//! gate resolved so the frontend can render for the right user.

use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};

use crate::dashgate::session::{CurrentUser, Sessions};

#[utoipa::path(
    get,
    path = "/app",
    responses(
        (status = 200, description = "Session identity for the dashboard shell"),
        (status = 302, description = "No session, redirected to the landing view"),
    ),
    tag = "dashgate",
)]
pub async fn app(
    Extension(sessions): Extension<Sessions>,
    Extension(CurrentUser(session)): Extension<CurrentUser>,
) -> Json<Value> {
    Json(json!({
        "user_id": session.user_id,
        "is_admin": sessions.is_admin(&session.user_id),
    }))
}
