//! Registration and login handlers.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::{LoginRequest, RegisterRequest, TokenResponse};

use super::super::responses::{handle_error, ApiResponse};
use super::super::AppState;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered"),
        (status = 409, description = "Username already taken"),
    )
)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Response {
    match state.auth_service.register(request.username, request.password).await {
        Ok(user_id) => Json(ApiResponse::success(user_id)).into_response(),
        Err(e) => handle_error(e),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    match state.auth_service.login(&request.username, &request.password).await {
        Ok(access_token) => Json(ApiResponse::success(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.config.auth.token_ttl_seconds,
        }))
        .into_response(),
        Err(e) => handle_error(e),
    }
}
