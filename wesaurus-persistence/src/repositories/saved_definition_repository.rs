use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::{definitions, prelude::*, saved_definitions};
use crate::repositories::DefinitionRepository;
use wesaurus_types::Definition;

/// Rows of a user's saved definitions. like_count bookkeeping lives with the caller,
/// which runs both writes in one transaction.
pub struct SavedDefinitionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SavedDefinitionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn exists(&self, user_id: i32, definition_id: i32) -> Result<bool> {
        let saved = SavedDefinitions::find_by_id((user_id, definition_id))
            .one(self.db)
            .await?;
        Ok(saved.is_some())
    }

    pub async fn list_definitions(&self, user_id: i32) -> Result<Vec<Definition>> {
        let definitions = Definitions::find()
            .inner_join(SavedDefinitions)
            .filter(saved_definitions::Column::UserId.eq(user_id))
            .order_by_asc(definitions::Column::Id)
            .all(self.db)
            .await?;

        Ok(definitions
            .into_iter()
            .map(DefinitionRepository::<C>::model_to_definition)
            .collect())
    }

    /// Users who currently have `definition_id` saved.
    pub async fn find_user_ids(&self, definition_id: i32) -> Result<Vec<i32>> {
        let saved = SavedDefinitions::find()
            .filter(saved_definitions::Column::DefinitionId.eq(definition_id))
            .order_by_asc(saved_definitions::Column::UserId)
            .all(self.db)
            .await?;

        Ok(saved.into_iter().map(|row| row.user_id).collect())
    }

    /// How many of the user's saved definitions define `word_id`.
    pub async fn count_for_word(&self, user_id: i32, word_id: i32) -> Result<u64> {
        let count = SavedDefinitions::find()
            .inner_join(Definitions)
            .filter(saved_definitions::Column::UserId.eq(user_id))
            .filter(definitions::Column::WordId.eq(word_id))
            .count(self.db)
            .await?;

        Ok(count)
    }

    pub async fn insert(&self, user_id: i32, definition_id: i32) -> Result<()> {
        let saved_model = saved_definitions::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            definition_id: sea_orm::ActiveValue::Set(definition_id),
        };

        SavedDefinitions::insert(saved_model)
            .exec_without_returning(self.db)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, user_id: i32, definition_id: i32) -> Result<bool> {
        let result = SavedDefinitions::delete_by_id((user_id, definition_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
