//! Symbolic execution result types (§3, §4 C6/C7).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The reason a branch was classified as pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PruneReason {
    Unreachable,
    Unsatisfiable,
    RedundantCondition,
    Unknown,
}

/// One feasible path through a flow, discovered by the symbolic executor
/// and confirmed satisfiable with a concrete model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaseResult {
    pub end_node_id: String,
    pub end_metadata: serde_json::Value,
    pub constraints: Vec<String>,
    pub concrete: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A branch classified as infeasible or otherwise unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrunedBranch {
    pub node_id: String,
    pub is_false_case: Option<bool>,
    pub reason: PruneReason,
    pub unsat_constraints: Vec<String>,
}

/// A condition simplified against its path context before continuing
/// traversal, recorded for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReductionInfo {
    pub node_id: String,
    pub original: String,
    pub simplified: String,
    pub removed_parts: Vec<String>,
}

/// A satisfiable path that reaches a non-`END` dead end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UncoveredPath {
    pub node_id: String,
    pub constraints: Vec<String>,
}

/// Structural coverage summary of one symbolic run: `endCount` is the
/// number of distinct `END` nodes reached with a concretized model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coverage {
    pub end_count: usize,
    pub total_end_nodes: usize,
}

impl Coverage {
    pub fn ratio(&self) -> f64 {
        if self.total_end_nodes == 0 {
            0.0
        } else {
            self.end_count as f64 / self.total_end_nodes as f64
        }
    }
}

/// The full output of one symbolic evaluation of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymbolicReport {
    pub cases: Vec<CaseResult>,
    pub pruned: Vec<PrunedBranch>,
    pub reductions: Vec<ReductionInfo>,
    pub uncovered: Vec<UncoveredPath>,
    pub coverage: Coverage,
}

/// A persisted summary of one symbolic run, used to compute the rolling
/// Symbolic Evolution Index between a flow's last two runs. At most two
/// summaries per flow are retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymbolicExecution {
    pub id: Uuid,
    pub flow_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub pruned: usize,
    pub reductions: usize,
    pub uncovered: usize,
    pub coverage: f64,
}

/// Telemetry response: the current run's report plus the evolution index
/// computed against the prior persisted run, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymbolicEvaluationResponse {
    pub report: SymbolicReport,
    pub evolution_index: f64,
}
