use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_users::Users;
use crate::m20250301_000002_create_access_points::AccessPoints;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create visitors table
        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Visitors::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Visitors::FullName).string().not_null())
                    .col(ColumnDef::new(Visitors::Phone).string().not_null())
                    .col(ColumnDef::new(Visitors::Email).string().null())
                    .col(ColumnDef::new(Visitors::Company).string().null())
                    .col(ColumnDef::new(Visitors::Purpose).string().not_null())
                    .col(ColumnDef::new(Visitors::HostUserId).string().null())
                    .col(ColumnDef::new(Visitors::RegisteredBy).string().null())
                    .col(ColumnDef::new(Visitors::Status).string().not_null().default("registered"))
                    .col(ColumnDef::new(Visitors::ExpectedAt).big_integer().null())
                    .col(ColumnDef::new(Visitors::CheckedInAt).big_integer().null())
                    .col(ColumnDef::new(Visitors::CheckedOutAt).big_integer().null())
                    .col(ColumnDef::new(Visitors::AccessPointId).string().null())
                    .col(ColumnDef::new(Visitors::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitors_host_user_id")
                            .from(Visitors::Table, Visitors::HostUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitors_registered_by")
                            .from(Visitors::Table, Visitors::RegisteredBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitors_access_point_id")
                            .from(Visitors::Table, Visitors::AccessPointId)
                            .to(AccessPoints::Table, AccessPoints::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Dashboards filter by status
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visitors_status")
                    .table(Visitors::Table)
                    .col(Visitors::Status)
                    .to_owned(),
            )
            .await?;

        // Create visitor_logs table
        manager
            .create_table(
                Table::create()
                    .table(VisitorLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VisitorLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VisitorLogs::VisitorId).string().not_null())
                    .col(ColumnDef::new(VisitorLogs::AccessPointId).string().null())
                    .col(ColumnDef::new(VisitorLogs::Event).string().not_null())
                    .col(ColumnDef::new(VisitorLogs::RecordedBy).string().null())
                    .col(ColumnDef::new(VisitorLogs::RecordedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitor_logs_visitor_id")
                            .from(VisitorLogs::Table, VisitorLogs::VisitorId)
                            .to(Visitors::Table, Visitors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visitor_logs_visitor_id")
                    .table(VisitorLogs::Table)
                    .col(VisitorLogs::VisitorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VisitorLogs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Visitors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Visitors {
    Table,
    Id,
    FullName,
    Phone,
    Email,
    Company,
    Purpose,
    HostUserId,
    RegisteredBy,
    Status,
    ExpectedAt,
    CheckedInAt,
    CheckedOutAt,
    AccessPointId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VisitorLogs {
    Table,
    Id,
    VisitorId,
    AccessPointId,
    Event,
    RecordedBy,
    RecordedAt,
}
