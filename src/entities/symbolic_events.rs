//! SeaORM entity for `symbolic_events` — the persisted sliding window of
//! `SymbolicExecution` summaries (at most two rows per `flow_id`) that the
//! telemetry layer reads to compute the Symbolic Evolution Index.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "symbolic_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub flow_id: Uuid,
    pub timestamp: DateTimeUtc,
    pub pruned: i32,
    pub reductions: i32,
    pub uncovered: i32,
    pub coverage: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
