//! SeaORM-based repository for the symbolic-run telemetry window.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{prelude::SymbolicEvents, symbolic_events};
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::SymbolicExecution;

use super::traits::SymbolicEventRepository;

/// The telemetry window keeps at most this many summaries per flow.
const WINDOW_SIZE: usize = 2;

#[derive(Clone)]
pub struct SymbolicEventSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl SymbolicEventSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }
}

fn model_to_execution(model: symbolic_events::Model) -> SymbolicExecution {
    SymbolicExecution {
        id: model.id,
        flow_id: model.flow_id,
        timestamp: model.timestamp,
        pruned: model.pruned as usize,
        reductions: model.reductions as usize,
        uncovered: model.uncovered as usize,
        coverage: model.coverage,
    }
}

#[async_trait]
impl SymbolicEventRepository for SymbolicEventSeaOrmRepository {
    async fn store(&self, execution: SymbolicExecution) -> RepositoryResult<()> {
        let active_model = symbolic_events::ActiveModel {
            id: Set(execution.id),
            flow_id: Set(execution.flow_id),
            timestamp: Set(execution.timestamp),
            pruned: Set(execution.pruned as i32),
            reductions: Set(execution.reductions as i32),
            uncovered: Set(execution.uncovered as i32),
            coverage: Set(execution.coverage),
        };
        active_model
            .insert(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        let existing = SymbolicEvents::find()
            .filter(symbolic_events::Column::FlowId.eq(execution.flow_id))
            .order_by(symbolic_events::Column::Timestamp, Order::Desc)
            .all(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        for stale in existing.into_iter().skip(WINDOW_SIZE) {
            SymbolicEvents::delete_by_id(stale.id)
                .exec(&*self.connection)
                .await
                .map_err(RepositoryError::Database)?;
        }

        Ok(())
    }

    async fn recent(&self, flow_id: Uuid) -> RepositoryResult<Vec<SymbolicExecution>> {
        let models = SymbolicEvents::find()
            .filter(symbolic_events::Column::FlowId.eq(flow_id))
            .order_by(symbolic_events::Column::Timestamp, Order::Desc)
            .limit(WINDOW_SIZE as u64)
            .all(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        Ok(models.into_iter().map(model_to_execution).collect())
    }

    async fn last_timestamp(&self, flow_id: Uuid) -> RepositoryResult<Option<DateTime<Utc>>> {
        let model = SymbolicEvents::find()
            .filter(symbolic_events::Column::FlowId.eq(flow_id))
            .order_by(symbolic_events::Column::Timestamp, Order::Desc)
            .one(&*self.connection)
            .await
            .map_err(RepositoryError::Database)?;

        Ok(model.map(|m| m.timestamp))
    }
}
