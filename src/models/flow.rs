//! The `Flow` document (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::node::Node;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Flow {
    pub flow_id: Uuid,
    pub flow_name: String,
    pub flow_description: String,
    pub owner_id: Uuid,
    pub nodes: Vec<Node>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flow {
    /// Returns the flow's unique `START` node, if present.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_start())
    }

    pub fn conditional_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_conditional()).count()
    }

    pub fn end_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_end()).count()
    }

    pub fn start_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_start()).count()
    }

    /// Children of `node_id`, optionally filtered by `is_false_case`.
    pub fn children_of(&self, node_id: &str, is_false_case: Option<bool>) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.parent_node_id() == Some(node_id))
            .filter(|n| is_false_case.is_none_or(|expected| n.is_false_case() == Some(expected)))
            .collect()
    }
}

/// Request body for creating a new flow.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFlowRequest {
    pub flow_name: String,
    pub flow_description: String,
}

/// Request body for updating a flow's name/description.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateFlowMetadataRequest {
    pub flow_name: Option<String>,
    pub flow_description: Option<String>,
}

/// Request body for replacing a flow's node list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateFlowNodesRequest {
    pub nodes: Vec<Node>,
}
