//! Node metadata types: the per-variant payload carried by each [`crate::models::node::Node`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The declared type of a single START input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Number,
    Text,
    Bool,
    Object,
    List,
}

/// One declared input of a flow's `START` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InputSpec {
    pub display_name: String,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub required: bool,
}

/// Metadata of a `START` node: the ordered input signature of the flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StartMetadata {
    pub inputs: Vec<InputSpec>,
}

/// Metadata of a `CONDITIONAL` node: a single expression string in the
/// grammar of the expression language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionalMetadata {
    pub expression: String,
}

/// Metadata of an `END` node: an arbitrary JSON-like response value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EndMetadata {
    pub response: serde_json::Value,
}
