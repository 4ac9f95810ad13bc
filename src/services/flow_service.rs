//! Flow CRUD service: thin business logic (ownership checks) over
//! [`FlowRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::metrics;
use crate::models::{CreateFlowRequest, Flow, UpdateFlowMetadataRequest, UpdateFlowNodesRequest};
use crate::repositories::FlowRepository;
use crate::telemetry::TelemetryService;

use super::traits::FlowService as FlowServiceTrait;

#[derive(Clone)]
pub struct FlowServiceImpl {
    repository: Arc<dyn FlowRepository>,
    telemetry: TelemetryService,
}

impl FlowServiceImpl {
    pub fn new(repository: Arc<dyn FlowRepository>, telemetry: TelemetryService) -> Self {
        Self { repository, telemetry }
    }

    async fn owned_flow(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<Flow> {
        let flow = self
            .repository
            .find_by_id(flow_id)
            .await?
            .ok_or_else(|| AppError::not_found("flow", flow_id.to_string()))?;

        if flow.owner_id != owner_id {
            return Err(AppError::not_found("flow", flow_id.to_string()));
        }

        Ok(flow)
    }
}

#[async_trait]
impl FlowServiceTrait for FlowServiceImpl {
    async fn get(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<Option<Flow>> {
        match self.owned_flow(owner_id, flow_id).await {
            Ok(flow) => Ok(Some(flow)),
            Err(AppError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list(&self, owner_id: Uuid) -> AppResult<Vec<Flow>> {
        Ok(self.repository.find_by_owner(owner_id).await?)
    }

    async fn create(&self, owner_id: Uuid, request: CreateFlowRequest) -> AppResult<Flow> {
        Ok(self.repository.create(owner_id, request).await?)
    }

    async fn update_metadata(&self, owner_id: Uuid, flow_id: Uuid, request: UpdateFlowMetadataRequest) -> AppResult<Flow> {
        self.owned_flow(owner_id, flow_id).await?;
        Ok(self.repository.update_metadata(flow_id, request).await?)
    }

    async fn update_nodes(&self, owner_id: Uuid, flow_id: Uuid, request: UpdateFlowNodesRequest) -> AppResult<Flow> {
        self.owned_flow(owner_id, flow_id).await?;

        // §4.6: mutating a flow's nodes emits a time-to-modification gauge
        // measuring the gap since its last symbolic run, if any.
        if let Some(last_run) = self.telemetry.last_symbolic_execution_timestamp(flow_id).await? {
            let seconds = (Utc::now() - last_run).num_milliseconds() as f64 / 1000.0;
            metrics::record_time_to_modification(flow_id, seconds.max(0.0));
        }

        Ok(self.repository.update_nodes(flow_id, request).await?)
    }

    async fn delete(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<()> {
        self.owned_flow(owner_id, flow_id).await?;
        Ok(self.repository.delete(flow_id).await?)
    }
}
