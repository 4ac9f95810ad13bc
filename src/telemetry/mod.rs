//! Telemetry (C7): persists a sliding window of two `SymbolicExecution`
//! summaries per flow and computes the Symbolic Evolution Index between
//! them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::SymbolicExecution;
use crate::repositories::SymbolicEventRepository;

/// Per-metric weight in the evolution index, matching the sign of each
/// metric's desirable direction: pruning/uncovered growth is bad, coverage
/// growth is good.
const WEIGHTS: [(&str, f64); 4] = [
    ("pruned", -1.0),
    ("uncovered", -0.7),
    ("reductions", -0.3),
    ("coverage", 1.5),
];

#[derive(Clone)]
pub struct TelemetryService {
    repository: Arc<dyn SymbolicEventRepository>,
}

impl TelemetryService {
    pub fn new(repository: Arc<dyn SymbolicEventRepository>) -> Self {
        Self { repository }
    }

    /// Persist `execution`. The repository retains only the two most
    /// recent rows per flow.
    pub async fn store_symbolic_execution(&self, execution: SymbolicExecution) -> AppResult<()> {
        self.repository.store(execution).await?;
        Ok(())
    }

    pub async fn last_symbolic_execution_timestamp(&self, flow_id: Uuid) -> AppResult<Option<DateTime<Utc>>> {
        Ok(self.repository.last_timestamp(flow_id).await?)
    }

    /// The Symbolic Evolution Index: a [-1, 1] score of whether the flow's
    /// most recent symbolic run improved on the one before it. Returns 0.0
    /// when fewer than two runs are on record.
    pub async fn compute_symbolic_evolution_index(&self, flow_id: Uuid) -> AppResult<f64> {
        let recent = self.repository.recent(flow_id).await?;
        if recent.len() < 2 {
            return Ok(0.0);
        }

        let curr = &recent[0];
        let prev = &recent[1];

        let deltas = [
            clipped_delta(prev.pruned as f64, curr.pruned as f64),
            clipped_delta(prev.uncovered as f64, curr.uncovered as f64),
            clipped_delta(prev.reductions as f64, curr.reductions as f64),
            clipped_delta(prev.coverage, curr.coverage),
        ];

        let mut score = 0.0;
        let mut total = 0.0;
        for (delta, (_, weight)) in deltas.into_iter().zip(WEIGHTS) {
            score += weight * delta;
            total += weight.abs();
        }

        Ok((score / total).clamp(-1.0, 1.0))
    }
}

/// `(new - old)` clipped to `[-5, 5]` then normalized to `[-1, 1]`.
fn clipped_delta(old: f64, new: f64) -> f64 {
    (new - old).clamp(-5.0, 5.0) / 5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_delta_saturates() {
        assert_eq!(clipped_delta(0.0, 100.0), 1.0);
        assert_eq!(clipped_delta(100.0, 0.0), -1.0);
        assert_eq!(clipped_delta(1.0, 3.0), 0.4);
    }
}
