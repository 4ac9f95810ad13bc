//! HTTP response types and error-to-status mapping.
//!
//! Mirrors the teacher's `web::responses` module: a single `ApiResponse<T>`
//! envelope and one chokepoint (`handle_error`) translating `AppError` into
//! the right status code, following the taxonomy of spec.md §7.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            details: None,
        }
    }

    pub fn error_with_details(message: String, details: HashMap<String, String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            details: Some(details),
        }
    }
}

/// Converts an `AppResult<T>` into a `200`/error-status HTTP response with
/// the standard `ApiResponse` envelope.
pub fn handle_result<T: Serialize>(result: AppResult<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(err) => handle_error(err),
    }
}

/// The single place `AppError` variants are mapped to HTTP status codes,
/// per spec.md §7's error-handling table.
pub fn handle_error(error: AppError) -> Response {
    let (status, message, details) = match &error {
        AppError::InvalidObjectId { id } => (StatusCode::BAD_REQUEST, format!("invalid identifier: {id}"), None),
        AppError::NotFound { resource, id } => (StatusCode::NOT_FOUND, format!("{resource} '{id}' not found"), None),
        AppError::InvalidPayload { details } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "payload failed validation".to_string(),
            Some(details.clone()),
        ),
        AppError::InvalidFlow { message } => (StatusCode::BAD_REQUEST, message.clone(), None),
        AppError::RuntimeError { .. } => (StatusCode::INTERNAL_SERVER_ERROR, error.to_string(), None),
        AppError::SymbolicTimeout => (StatusCode::GATEWAY_TIMEOUT, "symbolic evaluation timed out".to_string(), None),
        AppError::UpdateFailed { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone(), None),
        AppError::DuplicateKey { message } => (StatusCode::CONFLICT, message.clone(), None),
        AppError::DatabaseUnavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message.clone(), None),
        AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone(), None),
        AppError::Database(_) | AppError::Repository(_) | AppError::Expression(_) | AppError::Web(_) | AppError::Internal { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string(), None)
        }
    };

    tracing::warn!(status = status.as_u16(), error = %error, "request failed");

    let body = match details {
        Some(details) => ApiResponse::<()>::error_with_details(message, details),
        None => ApiResponse::<()>::error(message),
    };

    (status, Json(body)).into_response()
}
