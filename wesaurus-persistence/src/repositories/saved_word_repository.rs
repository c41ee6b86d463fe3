use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{prelude::*, saved_words, words};
use crate::repositories::WordRepository;
use wesaurus_types::Word;

/// Rows of a user's personal word list.
pub struct SavedWordRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SavedWordRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, user_id: i32, word_id: i32) -> Result<Option<saved_words::Model>> {
        let saved = SavedWords::find_by_id((user_id, word_id))
            .one(self.db)
            .await?;
        Ok(saved)
    }

    /// The user's saved words, in word id order.
    pub async fn list_words(&self, user_id: i32) -> Result<Vec<Word>> {
        let words = Words::find()
            .inner_join(SavedWords)
            .filter(saved_words::Column::UserId.eq(user_id))
            .order_by_asc(words::Column::Id)
            .all(self.db)
            .await?;

        Ok(words
            .into_iter()
            .map(WordRepository::<C>::model_to_word)
            .collect())
    }

    pub async fn insert(&self, user_id: i32, word_id: i32, auto_saved: bool) -> Result<()> {
        let saved_model = saved_words::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(user_id),
            word_id: sea_orm::ActiveValue::Set(word_id),
            auto_saved: sea_orm::ActiveValue::Set(auto_saved),
        };

        SavedWords::insert(saved_model)
            .exec_without_returning(self.db)
            .await?;
        Ok(())
    }

    /// Turn an implicit save into an explicit one.
    pub async fn mark_explicit(&self, user_id: i32, word_id: i32) -> Result<()> {
        SavedWords::update_many()
            .col_expr(saved_words::Column::AutoSaved, Expr::value(false))
            .filter(saved_words::Column::UserId.eq(user_id))
            .filter(saved_words::Column::WordId.eq(word_id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, user_id: i32, word_id: i32) -> Result<bool> {
        let result = SavedWords::delete_by_id((user_id, word_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
