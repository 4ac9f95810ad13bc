//! SeaORM entity for the `decision_flows` table.
//!
//! `nodes` is stored as a JSON column holding the serialized `Vec<Node>` —
//! the flow graph is always read/written whole, so there is no benefit to
//! normalizing nodes into their own table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "decision_flows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub flow_id: Uuid,
    pub flow_name: String,
    pub flow_description: String,
    pub owner_id: Uuid,
    pub nodes: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
