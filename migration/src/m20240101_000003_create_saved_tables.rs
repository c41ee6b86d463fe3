use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::WeUser;
use super::m20240101_000002_create_words_table::{Definition, Word};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SavedWord::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedWord::UserId).integer().not_null())
                    .col(ColumnDef::new(SavedWord::WordId).integer().not_null())
                    .col(
                        ColumnDef::new(SavedWord::AutoSaved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .primary_key(
                        Index::create()
                            .col(SavedWord::UserId)
                            .col(SavedWord::WordId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_word_user")
                            .from(SavedWord::Table, SavedWord::UserId)
                            .to(WeUser::Table, WeUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_word_word")
                            .from(SavedWord::Table, SavedWord::WordId)
                            .to(Word::Table, Word::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavedDefinition::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedDefinition::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(SavedDefinition::DefinitionId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SavedDefinition::UserId)
                            .col(SavedDefinition::DefinitionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_definition_user")
                            .from(SavedDefinition::Table, SavedDefinition::UserId)
                            .to(WeUser::Table, WeUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_definition_definition")
                            .from(SavedDefinition::Table, SavedDefinition::DefinitionId)
                            .to(Definition::Table, Definition::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedDefinition::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SavedWord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SavedWord {
    Table,
    UserId,
    WordId,
    AutoSaved,
}

#[derive(DeriveIden)]
enum SavedDefinition {
    Table,
    UserId,
    DefinitionId,
}
