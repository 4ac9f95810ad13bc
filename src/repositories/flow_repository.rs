//! SeaORM-based `Flow` repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::{decision_flows, prelude::DecisionFlows};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{CreateFlowRequest, Flow, UpdateFlowMetadataRequest, UpdateFlowNodesRequest};

use super::traits::FlowRepository;

#[derive(Clone)]
pub struct FlowSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl FlowSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

fn model_to_flow(model: decision_flows::Model) -> RepositoryResult<Flow> {
    let nodes = serde_json::from_value(model.nodes).map_err(RepositoryError::SerializationFailed)?;
    Ok(Flow {
        flow_id: model.flow_id,
        flow_name: model.flow_name,
        flow_description: model.flow_description,
        owner_id: model.owner_id,
        nodes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[async_trait]
impl FlowRepository for FlowSeaOrmRepository {
    async fn find_by_id(&self, flow_id: Uuid) -> RepositoryResult<Option<Flow>> {
        let model = DecisionFlows::find_by_id(flow_id)
            .one(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        model.map(model_to_flow).transpose()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Vec<Flow>> {
        let models = DecisionFlows::find()
            .filter(decision_flows::Column::OwnerId.eq(owner_id))
            .all(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        models.into_iter().map(model_to_flow).collect()
    }

    async fn create(&self, owner_id: Uuid, request: CreateFlowRequest) -> RepositoryResult<Flow> {
        let now = Utc::now();
        let active_model = decision_flows::ActiveModel {
            flow_id: Set(Uuid::new_v4()),
            flow_name: Set(request.flow_name),
            flow_description: Set(request.flow_description),
            owner_id: Set(owner_id),
            nodes: Set(serde_json::Value::Array(Vec::new())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        model_to_flow(model)
    }

    async fn update_metadata(&self, flow_id: Uuid, request: UpdateFlowMetadataRequest) -> RepositoryResult<Flow> {
        let existing = DecisionFlows::find_by_id(flow_id)
            .one(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?
            .ok_or_else(|| RepositoryError::RecordNotFound {
                table: "decision_flows".to_string(),
                field: "flow_id".to_string(),
                value: flow_id.to_string(),
            })?;

        let mut active_model: decision_flows::ActiveModel = existing.into();
        if let Some(name) = request.flow_name {
            active_model.flow_name = Set(name);
        }
        if let Some(description) = request.flow_description {
            active_model.flow_description = Set(description);
        }
        active_model.updated_at = Set(Utc::now());

        let model = active_model
            .update(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        model_to_flow(model)
    }

    async fn update_nodes(&self, flow_id: Uuid, request: UpdateFlowNodesRequest) -> RepositoryResult<Flow> {
        let existing = DecisionFlows::find_by_id(flow_id)
            .one(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?
            .ok_or_else(|| RepositoryError::RecordNotFound {
                table: "decision_flows".to_string(),
                field: "flow_id".to_string(),
                value: flow_id.to_string(),
            })?;

        let nodes_json = serde_json::to_value(&request.nodes).map_err(RepositoryError::SerializationFailed)?;

        let mut active_model: decision_flows::ActiveModel = existing.into();
        active_model.nodes = Set(nodes_json);
        active_model.updated_at = Set(Utc::now());

        let model = active_model
            .update(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        model_to_flow(model)
    }

    async fn delete(&self, flow_id: Uuid) -> RepositoryResult<()> {
        DecisionFlows::delete_by_id(flow_id)
            .exec(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;
        Ok(())
    }
}
