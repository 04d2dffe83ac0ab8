use sea_orm_migration::prelude::*;

/// Creates the `note` table. Notes attach to any record through
/// (`noteable_type`, `noteable_id`), so there is no foreign key on the target.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Note::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Note::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Note::NoteableType).string_len(100).not_null())
                    .col(ColumnDef::new(Note::NoteableId).uuid().not_null())
                    .col(ColumnDef::new(Note::CreatorId).uuid().null())
                    .col(ColumnDef::new(Note::Content).text().not_null())
                    .col(
                        ColumnDef::new(Note::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_note_creator_id")
                            .from(Note::Table, Note::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_noteable")
                    .table(Note::Table)
                    .col(Note::NoteableType)
                    .col(Note::NoteableId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Note::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Note {
    Table,
    Id,
    NoteableType,
    NoteableId,
    CreatorId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
