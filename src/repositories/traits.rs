//! Repository trait definitions.
//!
//! These traits mirror the generic `Repository<T, ID>` shape used elsewhere
//! in this codebase, narrowed to each entity's own request/query types since
//! flows, symbolic-run summaries, and users do not share a CRUD surface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::RepositoryResult;
use crate::models::{CreateFlowRequest, Flow, SymbolicExecution, UpdateFlowMetadataRequest, UpdateFlowNodesRequest, User};

/// Data access for `Flow` documents.
#[async_trait]
pub trait FlowRepository: Send + Sync {
    /// Find a flow by its id.
    ///
    /// # Arguments
    ///
    /// * `flow_id` - The flow's unique identifier
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Flow))` - Flow found
    /// * `Ok(None)` - No flow with that id
    async fn find_by_id(&self, flow_id: Uuid) -> RepositoryResult<Option<Flow>>;

    /// List every flow owned by `owner_id`.
    async fn find_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Vec<Flow>>;

    /// Create a new flow with an empty node list.
    async fn create(&self, owner_id: Uuid, request: CreateFlowRequest) -> RepositoryResult<Flow>;

    /// Update a flow's name/description.
    async fn update_metadata(&self, flow_id: Uuid, request: UpdateFlowMetadataRequest) -> RepositoryResult<Flow>;

    /// Replace a flow's node list wholesale.
    async fn update_nodes(&self, flow_id: Uuid, request: UpdateFlowNodesRequest) -> RepositoryResult<Flow>;

    /// Delete a flow by id.
    async fn delete(&self, flow_id: Uuid) -> RepositoryResult<()>;
}

/// Data access for the sliding window of persisted `SymbolicExecution` summaries.
#[async_trait]
pub trait SymbolicEventRepository: Send + Sync {
    /// Insert a new summary, evicting the oldest once a flow has more than
    /// two rows on record.
    async fn store(&self, execution: SymbolicExecution) -> RepositoryResult<()>;

    /// The two most recent summaries for `flow_id`, newest first.
    async fn recent(&self, flow_id: Uuid) -> RepositoryResult<Vec<SymbolicExecution>>;

    /// Timestamp of the most recent summary, if any.
    async fn last_timestamp(&self, flow_id: Uuid) -> RepositoryResult<Option<DateTime<Utc>>>;
}

/// Data access for `User` accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    async fn find_by_id(&self, user_id: Uuid) -> RepositoryResult<Option<User>>;

    async fn create(&self, username: String, password_hash: String) -> RepositoryResult<User>;
}
