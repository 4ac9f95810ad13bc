//! Flow CRUD service integration tests against a real SeaORM connection:
//! ownership scoping and the `UpdateFlowNodesRequest` round trip.

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use uuid::Uuid;

use decision_flow_engine::errors::AppError;
use decision_flow_engine::migrations::Migrator;
use decision_flow_engine::models::{CreateFlowRequest, UpdateFlowNodesRequest};
use decision_flow_engine::repositories::{FlowSeaOrmRepository, SymbolicEventSeaOrmRepository};
use decision_flow_engine::services::{FlowService, FlowServiceImpl};
use decision_flow_engine::telemetry::TelemetryService;

async fn flow_service() -> FlowServiceImpl {
    let connection = Database::connect("sqlite::memory:").await.expect("in-memory sqlite connects");
    Migrator::up(&connection, None).await.expect("migrations apply cleanly");
    let connection = Arc::new(connection);

    let flow_repository = Arc::new(FlowSeaOrmRepository::new(connection.clone()));
    let telemetry_repository = Arc::new(SymbolicEventSeaOrmRepository::new(connection));
    let telemetry = TelemetryService::new(telemetry_repository);

    FlowServiceImpl::new(flow_repository, telemetry)
}

#[tokio::test]
async fn create_then_fetch_round_trips() {
    let service = flow_service().await;
    let owner_id = Uuid::new_v4();

    let created = service
        .create(
            owner_id,
            CreateFlowRequest {
                flow_name: "onboarding".to_string(),
                flow_description: "routes new users".to_string(),
            },
        )
        .await
        .unwrap();

    let fetched = service.get(owner_id, created.flow_id).await.unwrap();
    assert_eq!(fetched.unwrap().flow_id, created.flow_id);
}

#[tokio::test]
async fn a_flow_is_invisible_to_a_non_owner() {
    let service = flow_service().await;
    let owner_id = Uuid::new_v4();
    let other_owner = Uuid::new_v4();

    let created = service
        .create(
            owner_id,
            CreateFlowRequest {
                flow_name: "private".to_string(),
                flow_description: "owner-scoped".to_string(),
            },
        )
        .await
        .unwrap();

    let result = service.get(other_owner, created.flow_id).await.unwrap();
    assert!(result.is_none(), "a flow must not be visible outside its owner");

    let delete_result = service.delete(other_owner, created.flow_id).await;
    assert!(matches!(delete_result, Err(AppError::NotFound { .. })));
}

#[tokio::test]
async fn update_nodes_replaces_the_node_list() {
    let service = flow_service().await;
    let owner_id = Uuid::new_v4();

    let created = service
        .create(
            owner_id,
            CreateFlowRequest {
                flow_name: "blank".to_string(),
                flow_description: "starts with no nodes".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(created.nodes.is_empty());

    let updated = service
        .update_nodes(owner_id, created.flow_id, UpdateFlowNodesRequest { nodes: vec![] })
        .await
        .unwrap();

    assert_eq!(updated.flow_id, created.flow_id);
    assert!(updated.nodes.is_empty());
}

#[tokio::test]
async fn list_only_returns_the_caller_owned_flows() {
    let service = flow_service().await;
    let owner_a = Uuid::new_v4();
    let owner_b = Uuid::new_v4();

    service
        .create(
            owner_a,
            CreateFlowRequest {
                flow_name: "a".to_string(),
                flow_description: "owned by a".to_string(),
            },
        )
        .await
        .unwrap();
    service
        .create(
            owner_b,
            CreateFlowRequest {
                flow_name: "b".to_string(),
                flow_description: "owned by b".to_string(),
            },
        )
        .await
        .unwrap();

    let owned_by_a = service.list(owner_a).await.unwrap();
    assert_eq!(owned_by_a.len(), 1);
    assert_eq!(owned_by_a[0].flow_name, "a");
}
