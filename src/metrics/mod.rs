//! Metrics sink (C9): counters/histograms/gauges for the evaluation
//! pipeline, per §4.7. This is an interface over the `metrics` facade crate
//! exactly as spec.md §1 scopes it — the scrape format (Prometheus via
//! `metrics-exporter-prometheus`) is wired once in `main` and is otherwise
//! none of this module's concern.

use uuid::Uuid;

use crate::models::SymbolicReport;

/// Records a completed concrete evaluation.
pub fn record_concrete_evaluation(flow_id: Uuid) {
    metrics::counter!("tests_total", "flow_id" => flow_id.to_string()).increment(1);
}

/// Records a completed symbolic run: duration and the inconsistencies
/// ratio derived from the report (§4.7).
pub fn record_symbolic_run(flow_id: Uuid, duration: std::time::Duration, report: &SymbolicReport, conditional_count: usize) {
    metrics::histogram!("symbolic_execution_duration_seconds", "flow_id" => flow_id.to_string())
        .record(duration.as_secs_f64());
    metrics::gauge!("inconsistencies_ratio", "flow_id" => flow_id.to_string())
        .set(inconsistencies_ratio(report, conditional_count));
}

/// Records the Symbolic Evolution Index computed after persisting a run.
pub fn record_evolution_index(flow_id: Uuid, index: f64) {
    metrics::gauge!("evolution_index", "flow_id" => flow_id.to_string()).set(index);
}

/// Records the gap between a flow's last symbolic run and a mutation to
/// its nodes — the `time_to_modification_seconds` gauge of §4.6.
pub fn record_time_to_modification(flow_id: Uuid, seconds: f64) {
    metrics::gauge!("time_to_modification_seconds", "flow_id" => flow_id.to_string()).set(seconds);
}

pub fn record_symbolic_timeout() {
    metrics::counter!("execution_timeouts_total").increment(1);
    metrics::counter!("execution_errors_total").increment(1);
}

pub fn record_execution_error() {
    metrics::counter!("execution_errors_total").increment(1);
}

/// `|{nodeIds appearing in pruned ∪ reductions ∪ uncovered}| / |{conditional nodes}|`,
/// `0` when there are no conditionals (§4.7).
fn inconsistencies_ratio(report: &SymbolicReport, conditional_count: usize) -> f64 {
    if conditional_count == 0 {
        return 0.0;
    }

    let mut node_ids = std::collections::HashSet::new();
    node_ids.extend(report.pruned.iter().map(|p| p.node_id.as_str()));
    node_ids.extend(report.reductions.iter().map(|r| r.node_id.as_str()));
    node_ids.extend(report.uncovered.iter().map(|u| u.node_id.as_str()));

    node_ids.len() as f64 / conditional_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coverage, PruneReason, PrunedBranch, ReductionInfo, UncoveredPath};

    fn empty_report() -> SymbolicReport {
        SymbolicReport {
            cases: Vec::new(),
            pruned: Vec::new(),
            reductions: Vec::new(),
            uncovered: Vec::new(),
            coverage: Coverage { end_count: 0, total_end_nodes: 0 },
        }
    }

    #[test]
    fn ratio_is_zero_with_no_conditionals() {
        assert_eq!(inconsistencies_ratio(&empty_report(), 0), 0.0);
    }

    #[test]
    fn ratio_counts_distinct_node_ids_across_categories() {
        let mut report = empty_report();
        report.pruned.push(PrunedBranch {
            node_id: "c1".to_string(),
            is_false_case: Some(true),
            reason: PruneReason::Unreachable,
            unsat_constraints: vec![],
        });
        report.reductions.push(ReductionInfo {
            node_id: "c1".to_string(),
            original: "x > 5".to_string(),
            simplified: "true".to_string(),
            removed_parts: vec!["x > 5".to_string()],
        });
        report.uncovered.push(UncoveredPath {
            node_id: "c2".to_string(),
            constraints: vec![],
        });

        assert_eq!(inconsistencies_ratio(&report, 4), 0.5);
    }
}
