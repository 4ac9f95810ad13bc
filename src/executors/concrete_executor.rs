//! Concrete executor (C5): a deterministic walk of the flow graph.

use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::evaluators::eval_concrete;
use crate::expression::{parse, Value};
use crate::models::{Flow, Node};

/// Walks `flow` from its `START` child using `payload` as the environment,
/// returning the `END` node's response.
pub fn execute(flow: &Flow, payload: &BTreeMap<String, Value>) -> Result<serde_json::Value, AppError> {
    let start = flow
        .start_node()
        .ok_or_else(|| AppError::invalid_flow("flow has no START node"))?;

    let mut remaining: Vec<&Node> = flow.nodes.iter().filter(|n| !n.is_start()).collect();

    let mut current = take_matching(&mut remaining, |n| n.parent_node_id() == Some(start.node_id()))
        .ok_or_else(|| AppError::invalid_flow("START node has no child"))?;

    loop {
        match current {
            Node::Conditional(cond_node) => {
                let expr_text = cond_node.metadata.expression.replace('\'', "\"");
                let expr = parse(expr_text.trim()).map_err(|e| AppError::runtime_error(&e))?;
                let value = eval_concrete(&expr, payload).map_err(|e| AppError::runtime_error(&e))?;
                let result = value.as_bool().map_err(|e| AppError::runtime_error(&e))?;

                let node_id = cond_node.header.node_id.clone();
                let next = take_matching(&mut remaining, |n| {
                    n.parent_node_id() == Some(node_id.as_str()) && n.is_false_case() == Some(!result)
                })
                .ok_or_else(|| AppError::invalid_flow(format!("could not find next node from {node_id}")))?;

                current = next;
            }
            Node::End(end_node) => {
                return Ok(end_node.metadata.response.clone());
            }
            Node::Start(_) => {
                return Err(AppError::invalid_flow("unexpected second START node during traversal"));
            }
        }
    }
}

fn take_matching<'a>(
    nodes: &mut Vec<&'a Node>,
    predicate: impl Fn(&Node) -> bool,
) -> Option<&'a Node> {
    let idx = nodes.iter().position(|n| predicate(n))?;
    Some(nodes.remove(idx))
}
