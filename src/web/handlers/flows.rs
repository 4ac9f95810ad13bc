//! Decision flow CRUD handlers, scoped to the authenticated owner.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CreateFlowRequest, UpdateFlowMetadataRequest, UpdateFlowNodesRequest};

use super::super::extractors::AuthUser;
use super::super::responses::handle_result;
use super::super::AppState;

#[utoipa::path(
    post,
    path = "/flows",
    tag = "flows",
    request_body = CreateFlowRequest,
    responses((status = 200, description = "Flow created", body = crate::models::Flow))
)]
pub async fn create(State(state): State<AppState>, AuthUser(owner_id): AuthUser, Json(request): Json<CreateFlowRequest>) -> Response {
    handle_result(state.flow_service.create(owner_id, request).await)
}

#[utoipa::path(
    get,
    path = "/flows",
    tag = "flows",
    responses((status = 200, description = "Flows owned by the caller", body = Vec<crate::models::Flow>))
)]
pub async fn list(State(state): State<AppState>, AuthUser(owner_id): AuthUser) -> Response {
    handle_result(state.flow_service.list(owner_id).await)
}

#[utoipa::path(
    get,
    path = "/flows/{id}",
    tag = "flows",
    params(("id" = Uuid, Path, description = "Flow id")),
    responses(
        (status = 200, description = "Flow", body = crate::models::Flow),
        (status = 404, description = "Flow not found"),
    )
)]
pub async fn get(State(state): State<AppState>, AuthUser(owner_id): AuthUser, Path(id): Path<Uuid>) -> Response {
    let result = state.flow_service.get(owner_id, id).await.and_then(|flow| {
        flow.ok_or_else(|| AppError::not_found("flow", id.to_string()))
    });
    handle_result(result)
}

#[utoipa::path(
    patch,
    path = "/flows/{id}",
    tag = "flows",
    params(("id" = Uuid, Path, description = "Flow id")),
    request_body = UpdateFlowMetadataRequest,
    responses((status = 200, description = "Flow updated", body = crate::models::Flow))
)]
pub async fn update_metadata(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFlowMetadataRequest>,
) -> Response {
    handle_result(state.flow_service.update_metadata(owner_id, id, request).await)
}

#[utoipa::path(
    put,
    path = "/flows/{id}/nodes",
    tag = "flows",
    params(("id" = Uuid, Path, description = "Flow id")),
    request_body = UpdateFlowNodesRequest,
    responses((status = 200, description = "Flow's nodes replaced", body = crate::models::Flow))
)]
pub async fn update_nodes(
    State(state): State<AppState>,
    AuthUser(owner_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFlowNodesRequest>,
) -> Response {
    handle_result(state.flow_service.update_nodes(owner_id, id, request).await)
}

#[utoipa::path(
    delete,
    path = "/flows/{id}",
    tag = "flows",
    params(("id" = Uuid, Path, description = "Flow id")),
    responses((status = 200, description = "Flow deleted"))
)]
pub async fn delete(State(state): State<AppState>, AuthUser(owner_id): AuthUser, Path(id): Path<Uuid>) -> Response {
    handle_result(state.flow_service.delete(owner_id, id).await)
}
