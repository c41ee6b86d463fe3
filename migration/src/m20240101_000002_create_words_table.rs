use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::WeUser;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Word::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Word::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Word::Text).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Definition::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Definition::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Definition::AuthorId).integer().not_null())
                    .col(ColumnDef::new(Definition::WordId).integer().not_null())
                    .col(ColumnDef::new(Definition::Text).text().not_null())
                    .col(
                        ColumnDef::new(Definition::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Definition::DateCreated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_definition_author")
                            .from(Definition::Table, Definition::AuthorId)
                            .to(WeUser::Table, WeUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // Words with definitions are never deleted, so no cascade here
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_definition_word")
                            .from(Definition::Table, Definition::WordId)
                            .to(Word::Table, Word::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on word_id for the "word in use" check and per-word listings
        manager
            .create_index(
                Index::create()
                    .name("idx_definition_word_id")
                    .table(Definition::Table)
                    .col(Definition::WordId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_definition_author_id")
                    .table(Definition::Table)
                    .col(Definition::AuthorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Definition::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Word::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Word {
    Table,
    Id,
    Text,
}

#[derive(DeriveIden)]
pub enum Definition {
    Table,
    Id,
    AuthorId,
    WordId,
    Text,
    LikeCount,
    DateCreated,
}
