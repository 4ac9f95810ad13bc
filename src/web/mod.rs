//! HTTP surface (§7): axum router, shared application state, and the
//! request middleware stack. Mirrors the teacher's `web` module layout —
//! `mod.rs` owns `AppState` and router assembly, with responses,
//! extractors, middleware, handlers, and OpenAPI wiring split into their
//! own submodules.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod rate_limit;
pub mod responses;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi as _;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::{AuthService, EvaluationService, FlowService};

use self::rate_limit::RateLimiter;

/// Shared state injected into every handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub flow_service: Arc<dyn FlowService>,
    pub evaluation_service: Arc<dyn EvaluationService>,
    pub auth_service: Arc<dyn AuthService>,
    pub config: Arc<Config>,
    pub rate_limiter: Arc<RateLimiter>,
}

/// Builds the full axum router: health check, Swagger UI, auth, flow CRUD,
/// and evaluation endpoints, wrapped in request logging and rate-limiting
/// middleware (§7's HTTP surface table).
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/flows", post(handlers::flows::create).get(handlers::flows::list))
        .route(
            "/flows/{id}",
            get(handlers::flows::get)
                .patch(handlers::flows::update_metadata)
                .delete(handlers::flows::delete),
        )
        .route("/flows/{id}/nodes", put(handlers::flows::update_nodes))
        .route("/flows/{id}/evaluate", post(handlers::evaluation::evaluate_concrete))
        .route("/flows/{id}/test", get(handlers::evaluation::evaluate_symbolic))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            self::middleware::rate_limit_middleware,
        ));

    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .nest("/api/v1", api_routes)
        .layer(axum::middleware::from_fn(self::middleware::request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
