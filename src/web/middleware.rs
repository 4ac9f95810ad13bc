//! HTTP middleware: request logging and client rate limiting.

use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{Method, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use super::responses::ApiResponse;
use super::AppState;

/// Logs every request with timing, following the teacher's
/// `request_logging_middleware` shape.
pub async fn request_logging_middleware(method: Method, uri: Uri, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();

    info!(method = %method, uri = %uri, request_id = %request_id, "HTTP request started");

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration = start.elapsed();

    if status >= 400 {
        warn!(method = %method, uri = %uri, status, request_id = %request_id, duration_ms = duration.as_millis(), "HTTP request completed with error");
    } else {
        info!(method = %method, uri = %uri, status, request_id = %request_id, duration_ms = duration.as_millis(), "HTTP request completed");
    }

    response
}

/// Rejects requests exceeding the configured per-client quota with `429`.
/// Keyed on the peer's socket address since the crate sits behind no
/// trusted reverse proxy by default.
pub async fn rate_limit_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]));

    if !state.rate_limiter.check(client_ip) {
        warn!(client_ip = %client_ip, "request rejected by rate limiter");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(ApiResponse::<()>::error("rate limit exceeded".to_string())),
        )
            .into_response();
    }

    next.run(request).await
}
