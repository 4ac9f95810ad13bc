//! Concrete and symbolic evaluation handlers.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use super::super::extractors::AuthUser;
use super::super::responses::handle_result;
use super::super::AppState;

#[utoipa::path(
    post,
    path = "/flows/{id}/evaluate",
    tag = "evaluation",
    params(("id" = Uuid, Path, description = "Flow id")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Concrete evaluation result"),
        (status = 422, description = "Payload failed input validation"),
    )
)]
pub async fn evaluate_concrete(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<serde_json::Map<String, serde_json::Value>>,
) -> Response {
    handle_result(state.evaluation_service.evaluate_concrete(owner_id, id, payload).await)
}

#[utoipa::path(
    get,
    path = "/flows/{id}/test",
    tag = "evaluation",
    params(("id" = Uuid, Path, description = "Flow id")),
    responses(
        (status = 200, description = "Symbolic execution report", body = crate::models::SymbolicEvaluationResponse),
        (status = 504, description = "Symbolic evaluation timed out"),
    )
)]
pub async fn evaluate_symbolic(State(state): State<AppState>, AuthUser(owner_id): AuthUser, Path(id): Path<Uuid>) -> Response {
    handle_result(state.evaluation_service.evaluate_symbolic(owner_id, id).await)
}
