//! Orchestrates concrete/symbolic evaluation over a flow: ownership checks,
//! input validation, executor dispatch, and telemetry.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use z3::{Config, Context};

use crate::errors::{AppError, AppResult};
use crate::executors::{execute_concrete, execute_symbolic};
use crate::metrics;
use crate::models::{Flow, SymbolicEvaluationResponse, SymbolicExecution};
use crate::repositories::FlowRepository;
use crate::telemetry::TelemetryService;
use crate::utils::PayloadValidator;

use super::traits::EvaluationService as EvaluationServiceTrait;

#[derive(Clone)]
pub struct EvaluationServiceImpl {
    flow_repository: Arc<dyn FlowRepository>,
    telemetry: TelemetryService,
    /// SMT solver wall-clock budget per symbolic run, in milliseconds.
    symbolic_timeout_ms: u32,
}

impl EvaluationServiceImpl {
    pub fn new(flow_repository: Arc<dyn FlowRepository>, telemetry: TelemetryService, symbolic_timeout_ms: u32) -> Self {
        Self {
            flow_repository,
            telemetry,
            symbolic_timeout_ms,
        }
    }

    async fn owned_flow(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<Flow> {
        let flow = self
            .flow_repository
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
impl EvaluationServiceTrait for EvaluationServiceImpl {
    async fn evaluate_concrete(
        &self,
        owner_id: Uuid,
        flow_id: Uuid,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> AppResult<serde_json::Value> {
        let flow = self.owned_flow(owner_id, flow_id).await?;

        let start = flow
            .start_node()
            .and_then(|n| n.as_start())
            .ok_or_else(|| AppError::invalid_flow("flow has no START node"))?;

        let validator = PayloadValidator::new(&start.metadata);
        let env = validator
            .validate(&payload)
            .map_err(|details| AppError::InvalidPayload { details })?;

        let result = execute_concrete(&flow, &env);
        metrics::record_concrete_evaluation(flow_id);
        result
    }

    async fn evaluate_symbolic(&self, owner_id: Uuid, flow_id: Uuid) -> AppResult<SymbolicEvaluationResponse> {
        let flow = self.owned_flow(owner_id, flow_id).await?;

        if flow.start_count() != 1 {
            return Err(AppError::invalid_flow("flow must have exactly one START node"));
        }
        if flow.end_count() < 2 {
            return Err(AppError::invalid_flow("flow must have at least two END nodes"));
        }

        let conditional_count = flow.conditional_count();

        // The solver, scratch solver, and reverse_map are single-owner and
        // hold no suspension points (§5); the whole CPU-bound run is
        // dispatched to a worker thread so the request task is never
        // blocked. The `Context` is constructed inside the worker itself
        // since it is not `Send`.
        let timeout_ms = self.symbolic_timeout_ms;
        let flow_for_worker = flow.clone();
        let started = Instant::now();
        let report = tokio::task::spawn_blocking(move || {
            let cfg = Config::new();
            let ctx = Context::new(&cfg);
            execute_symbolic(&ctx, &flow_for_worker, timeout_ms)
        })
        .await
        .map_err(|e| AppError::internal(format!("symbolic worker thread panicked: {e}")))?;
        let elapsed = started.elapsed();

        let report = match report {
            Ok(report) => report,
            Err(AppError::SymbolicTimeout) => {
                metrics::record_symbolic_timeout();
                return Err(AppError::SymbolicTimeout);
            }
            Err(e) => {
                metrics::record_execution_error();
                return Err(e);
            }
        };

        metrics::record_symbolic_run(flow_id, elapsed, &report, conditional_count);

        let execution = SymbolicExecution {
            id: Uuid::new_v4(),
            flow_id,
            timestamp: Utc::now(),
            pruned: report.pruned.len(),
            reductions: report.reductions.len(),
            uncovered: report.uncovered.len(),
            coverage: report.coverage.ratio(),
        };

        self.telemetry.store_symbolic_execution(execution).await?;
        let evolution_index = self.telemetry.compute_symbolic_evolution_index(flow_id).await?;
        metrics::record_evolution_index(flow_id, evolution_index);

        Ok(SymbolicEvaluationResponse { report, evolution_index })
    }
}
