use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_users_table(manager).await?;
        self.create_decision_flows_table(manager).await?;
        self.create_symbolic_events_table(manager).await?;
        self.create_indexes(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SymbolicEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DecisionFlows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    fn create_uuid_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.uuid().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    fn create_timestamp_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    fn create_json_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.json_binary().not_null(),
            _ => col.text().not_null(),
        };
        col
    }

    async fn create_users_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(self.create_uuid_column(manager, Users::UserId).primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(self.create_timestamp_column(manager, Users::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_decision_flows_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DecisionFlows::Table)
                    .if_not_exists()
                    .col(
                        self.create_uuid_column(manager, DecisionFlows::FlowId)
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DecisionFlows::FlowName).string().not_null())
                    .col(ColumnDef::new(DecisionFlows::FlowDescription).string().not_null())
                    .col(self.create_uuid_column(manager, DecisionFlows::OwnerId))
                    .col(self.create_json_column(manager, DecisionFlows::Nodes))
                    .col(self.create_timestamp_column(manager, DecisionFlows::CreatedAt))
                    .col(self.create_timestamp_column(manager, DecisionFlows::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_decision_flows_owner_id")
                            .from(DecisionFlows::Table, DecisionFlows::OwnerId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_symbolic_events_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SymbolicEvents::Table)
                    .if_not_exists()
                    .col(self.create_uuid_column(manager, SymbolicEvents::Id).primary_key())
                    .col(self.create_uuid_column(manager, SymbolicEvents::FlowId))
                    .col(self.create_timestamp_column(manager, SymbolicEvents::Timestamp))
                    .col(ColumnDef::new(SymbolicEvents::Pruned).integer().not_null())
                    .col(ColumnDef::new(SymbolicEvents::Reductions).integer().not_null())
                    .col(ColumnDef::new(SymbolicEvents::Uncovered).integer().not_null())
                    .col(ColumnDef::new(SymbolicEvents::Coverage).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_symbolic_events_flow_id")
                            .from(SymbolicEvents::Table, SymbolicEvents::FlowId)
                            .to(DecisionFlows::Table, DecisionFlows::FlowId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_indexes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_decision_flows_owner_id")
                    .table(DecisionFlows::Table)
                    .col(DecisionFlows::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_symbolic_events_flow_id_timestamp")
                    .table(SymbolicEvents::Table)
                    .col(SymbolicEvents::FlowId)
                    .col(SymbolicEvents::Timestamp)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    UserId,
    Username,
    PasswordHash,
    CreatedAt,
}

#[derive(Iden)]
enum DecisionFlows {
    Table,
    FlowId,
    FlowName,
    FlowDescription,
    OwnerId,
    Nodes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SymbolicEvents {
    Table,
    Id,
    FlowId,
    Timestamp,
    Pruned,
    Reductions,
    Uncovered,
    Coverage,
}
