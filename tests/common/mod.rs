//! Shared flow fixtures for the integration suite.

use chrono::Utc;
use uuid::Uuid;

use decision_flow_engine::models::{
    ConditionalMetadata, ConditionalNode, EndMetadata, EndNode, Flow, InputSpec, InputType, Node, NodeHeader,
    StartMetadata, StartNode,
};

fn header(id: &str, parent: Option<&str>, is_false_case: Option<bool>) -> NodeHeader {
    NodeHeader {
        node_id: id.to_string(),
        node_name: id.to_string(),
        parent_node_id: parent.map(|p| p.to_string()),
        is_false_case,
    }
}

/// A two-branch flow: `age >= 18` routes to an "adult"/"minor" response.
pub fn age_gate_flow() -> Flow {
    Flow {
        flow_id: Uuid::new_v4(),
        flow_name: "age-gate".to_string(),
        flow_description: "routes on age".to_string(),
        owner_id: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        nodes: vec![
            Node::Start(StartNode {
                header: header("start", None, None),
                metadata: StartMetadata {
                    inputs: vec![InputSpec {
                        display_name: "age".to_string(),
                        input_type: InputType::Number,
                        required: true,
                    }],
                },
            }),
            Node::Conditional(ConditionalNode {
                header: header("c1", Some("start"), None),
                metadata: ConditionalMetadata {
                    expression: "age >= 18".to_string(),
                },
            }),
            Node::End(EndNode {
                header: header("end-adult", Some("c1"), Some(false)),
                metadata: EndMetadata {
                    response: serde_json::json!({"verdict": "adult"}),
                },
            }),
            Node::End(EndNode {
                header: header("end-minor", Some("c1"), Some(true)),
                metadata: EndMetadata {
                    response: serde_json::json!({"verdict": "minor"}),
                },
            }),
        ],
    }
}

/// A flow whose second conditional is logically unreachable on one branch:
/// `score > 90` then, only on the true side, `score < 10` — a contradiction
/// that the symbolic executor should prune.
pub fn contradictory_flow() -> Flow {
    Flow {
        flow_id: Uuid::new_v4(),
        flow_name: "contradiction".to_string(),
        flow_description: "second conditional is unreachable on the true branch".to_string(),
        owner_id: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        nodes: vec![
            Node::Start(StartNode {
                header: header("start", None, None),
                metadata: StartMetadata {
                    inputs: vec![InputSpec {
                        display_name: "score".to_string(),
                        input_type: InputType::Number,
                        required: true,
                    }],
                },
            }),
            Node::Conditional(ConditionalNode {
                header: header("c1", Some("start"), None),
                metadata: ConditionalMetadata {
                    expression: "score > 90".to_string(),
                },
            }),
            Node::Conditional(ConditionalNode {
                header: header("c2", Some("c1"), Some(false)),
                metadata: ConditionalMetadata {
                    expression: "score < 10".to_string(),
                },
            }),
            Node::End(EndNode {
                header: header("end-low", Some("c1"), Some(true)),
                metadata: EndMetadata {
                    response: serde_json::json!({"verdict": "low"}),
                },
            }),
            Node::End(EndNode {
                header: header("end-contradiction", Some("c2"), Some(false)),
                metadata: EndMetadata {
                    response: serde_json::json!({"verdict": "unreachable"}),
                },
            }),
            Node::End(EndNode {
                header: header("end-high", Some("c2"), Some(true)),
                metadata: EndMetadata {
                    response: serde_json::json!({"verdict": "high"}),
                },
            }),
        ],
    }
}
