use sea_orm_migration::prelude::*;

/// Creates the `location` table and the `location_user` pivot.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Location::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Location::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Location::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Location::ManagerId).uuid().null())
                    .col(
                        ColumnDef::new(Location::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_manager_id")
                            .from(Location::Table, Location::ManagerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LocationUser::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LocationUser::LocationId).uuid().not_null())
                    .col(ColumnDef::new(LocationUser::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(LocationUser::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LocationUser::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(LocationUser::LocationId)
                            .col(LocationUser::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_user_location_id")
                            .from(LocationUser::Table, LocationUser::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_user_user_id")
                            .from(LocationUser::Table, LocationUser::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationUser::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Location::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Location {
    Table,
    Id,
    Name,
    ManagerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LocationUser {
    Table,
    LocationId,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
