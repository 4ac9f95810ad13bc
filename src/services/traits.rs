//! Service-layer trait definitions: business operations layered over the
//! repository traits in [`crate::repositories::traits`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{CreateFlowRequest, Flow, SymbolicEvaluationResponse, UpdateFlowMetadataRequest, UpdateFlowNodesRequest};

/// Flow CRUD plus evaluation, scoped to the flow's owner.
#[async_trait]
pub trait FlowService: Send + Sync {
    /// Fetch a flow, returning `None` if it does not exist or is not owned
    /// by `owner_id`.
    async fn get(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<Option<Flow>>;

    async fn list(&self, owner_id: Uuid) -> AppResult<Vec<Flow>>;

    async fn create(&self, owner_id: Uuid, request: CreateFlowRequest) -> AppResult<Flow>;

    async fn update_metadata(&self, owner_id: Uuid, flow_id: Uuid, request: UpdateFlowMetadataRequest) -> AppResult<Flow>;

    async fn update_nodes(&self, owner_id: Uuid, flow_id: Uuid, request: UpdateFlowNodesRequest) -> AppResult<Flow>;

    async fn delete(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<()>;
}

/// Concrete and symbolic evaluation, orchestrating the executors and the
/// telemetry layer.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    /// Validates `payload` against the flow's declared input schema, then
    /// walks the flow deterministically. Returns `AppError::InvalidPayload`
    /// when validation fails.
    async fn evaluate_concrete(
        &self,
        owner_id: Uuid,
        flow_id: Uuid,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> AppResult<serde_json::Value>;

    /// Runs the symbolic executor over every path of the flow, persists the
    /// run summary, and returns it alongside the evolution index against
    /// the prior run.
    async fn evaluate_symbolic(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<SymbolicEvaluationResponse>;
}

/// Registration, login, and token verification.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, username: String, password: String) -> AppResult<Uuid>;

    async fn login(&self, username: &str, password: &str) -> AppResult<String>;

    fn verify(&self, token: &str) -> AppResult<Uuid>;
}
