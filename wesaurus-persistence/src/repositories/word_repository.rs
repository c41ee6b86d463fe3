use anyhow::Result;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{prelude::*, words};
use wesaurus_types::Word;

pub struct WordRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WordRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_word(model: words::Model) -> Word {
        Word {
            id: model.id,
            text: model.text,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Word>> {
        let words = Words::find()
            .order_by_asc(words::Column::Id)
            .all(self.db)
            .await?;

        Ok(words.into_iter().map(Self::model_to_word).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Word>> {
        let word_model = Words::find_by_id(id).one(self.db).await?;
        Ok(word_model.map(Self::model_to_word))
    }

    /// Exact, case-sensitive lookup.
    pub async fn find_by_text(&self, text: &str) -> Result<Option<Word>> {
        let word_model = Words::find()
            .filter(words::Column::Text.eq(text))
            .one(self.db)
            .await?;

        Ok(word_model.map(Self::model_to_word))
    }

    pub async fn create_word(&self, text: String) -> Result<Word> {
        let word_model = words::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            text: sea_orm::ActiveValue::Set(text),
        };

        let saved_model = Words::insert(word_model).exec(self.db).await?;

        let created_word = Words::find_by_id(saved_model.last_insert_id)
            .one(self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created word"))?;

        Ok(Self::model_to_word(created_word))
    }

    pub async fn update_text(&self, id: i32, text: String) -> Result<()> {
        let updated_word = words::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(id),
            text: sea_orm::ActiveValue::Set(text),
        };

        Words::update(updated_word).exec(self.db).await?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub async fn delete_word(&self, id: i32) -> Result<bool> {
        let result = Words::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
