use sea_orm_migration::prelude::*;

/// Creates the `alternate_email` table for secondary addresses owned by a user.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlternateEmail::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlternateEmail::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlternateEmail::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AlternateEmail::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AlternateEmail::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alternate_email_user_id")
                            .from(AlternateEmail::Table, AlternateEmail::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlternateEmail::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlternateEmail {
    Table,
    Id,
    UserId,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
