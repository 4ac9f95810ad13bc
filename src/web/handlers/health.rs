//! Liveness probe.

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy"),
    )
)]
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
