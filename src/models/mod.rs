//! Domain model types shared across the expression, evaluation, and web layers.

pub mod flow;
pub mod metadata;
pub mod node;
pub mod symbolic;
pub mod user;

pub use flow::{CreateFlowRequest, Flow, UpdateFlowMetadataRequest, UpdateFlowNodesRequest};
pub use metadata::{ConditionalMetadata, EndMetadata, InputSpec, InputType, StartMetadata};
pub use node::{ConditionalNode, EndNode, Node, NodeHeader, StartNode};
pub use symbolic::{
    CaseResult, Coverage, PruneReason, PrunedBranch, ReductionInfo, SymbolicEvaluationResponse,
    SymbolicExecution, SymbolicReport, UncoveredPath,
};
pub use user::{Claims, LoginRequest, RegisterRequest, TokenResponse, User};
