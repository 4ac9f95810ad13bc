//! The node tagged union (§3): `START` / `CONDITIONAL` / `END`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::metadata::{ConditionalMetadata, EndMetadata, StartMetadata};

/// Fields shared by every node variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NodeHeader {
    pub node_id: String,
    pub node_name: String,
    pub parent_node_id: Option<String>,
    pub is_false_case: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StartNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub metadata: StartMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionalNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub metadata: ConditionalMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EndNode {
    #[serde(flatten)]
    pub header: NodeHeader,
    pub metadata: EndMetadata,
}

/// Tagged union over the three node variants. `node_type` is the tag
/// discriminant persisted alongside the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "nodeType")]
pub enum Node {
    #[serde(rename = "START")]
    Start(StartNode),
    #[serde(rename = "CONDITIONAL")]
    Conditional(ConditionalNode),
    #[serde(rename = "END")]
    End(EndNode),
}

impl Node {
    pub fn header(&self) -> &NodeHeader {
        match self {
            Node::Start(n) => &n.header,
            Node::Conditional(n) => &n.header,
            Node::End(n) => &n.header,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.header().node_id
    }

    pub fn parent_node_id(&self) -> Option<&str> {
        self.header().parent_node_id.as_deref()
    }

    pub fn is_false_case(&self) -> Option<bool> {
        self.header().is_false_case
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Node::Start(_))
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Node::Conditional(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Node::End(_))
    }

    pub fn as_start(&self) -> Option<&StartNode> {
        match self {
            Node::Start(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_conditional(&self) -> Option<&ConditionalNode> {
        match self {
            Node::Conditional(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_end(&self) -> Option<&EndNode> {
        match self {
            Node::End(n) => Some(n),
            _ => None,
        }
    }
}
