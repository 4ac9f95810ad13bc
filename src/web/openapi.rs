//! OpenAPI specification assembly using `utoipa` annotations on handler
//! functions, following the teacher's `web::openapi` pattern.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Decision Flow Evaluation Engine API",
        version = "0.1.0",
        description = "Stores decision-flow graphs and evaluates them both concretely, against a payload, and symbolically, across every reachable path via an SMT solver.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API Version 1"),
    ),
    tags(
        (name = "auth", description = "Registration, login, and token issuance"),
        (name = "flows", description = "Decision flow CRUD"),
        (name = "evaluation", description = "Concrete and symbolic evaluation"),
        (name = "health", description = "Service health monitoring"),
    ),
    components(
        schemas(
            crate::models::Flow,
            crate::models::Node,
            crate::models::StartNode,
            crate::models::ConditionalNode,
            crate::models::EndNode,
            crate::models::CreateFlowRequest,
            crate::models::UpdateFlowMetadataRequest,
            crate::models::UpdateFlowNodesRequest,
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::TokenResponse,
            crate::models::SymbolicEvaluationResponse,
            crate::models::SymbolicReport,
            crate::models::CaseResult,
            crate::models::PrunedBranch,
            crate::models::ReductionInfo,
            crate::models::UncoveredPath,
            crate::models::Coverage,
            crate::web::responses::ApiResponse<crate::models::Flow>,
        )
    ),
    paths(
        crate::web::handlers::auth::register,
        crate::web::handlers::auth::login,
        crate::web::handlers::flows::create,
        crate::web::handlers::flows::list,
        crate::web::handlers::flows::get,
        crate::web::handlers::flows::update_metadata,
        crate::web::handlers::flows::update_nodes,
        crate::web::handlers::flows::delete,
        crate::web::handlers::evaluation::evaluate_concrete,
        crate::web::handlers::evaluation::evaluate_symbolic,
        crate::web::handlers::health::healthz,
    )
)]
pub struct ApiDoc;
