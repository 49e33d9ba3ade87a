use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccessPoints::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccessPoints::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(AccessPoints::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(AccessPoints::Location).string().null())
                    .col(ColumnDef::new(AccessPoints::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(AccessPoints::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessPoints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum AccessPoints {
    Table,
    Id,
    Name,
    Location,
    IsActive,
    CreatedAt,
}
