use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Voucher::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Voucher::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Voucher::CreatorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Voucher::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Voucher::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_creator_id")
                            .from(Voucher::Table, Voucher::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Voucher::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Voucher {
    Table,
    Id,
    CreatorId,
    Code,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
