//! Business-logic layer: flow CRUD, evaluation orchestration, and auth.

pub mod auth_service;
pub mod evaluation_service;
pub mod flow_service;
pub mod traits;

pub use auth_service::AuthServiceImpl;
pub use evaluation_service::EvaluationServiceImpl;
pub use flow_service::FlowServiceImpl;
pub use traits::{AuthService, EvaluationService, FlowService};
