use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::entities::{definitions, prelude::*, words};
use wesaurus_types::Definition;

pub struct DefinitionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DefinitionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_definition(model: definitions::Model) -> Definition {
        Definition {
            id: model.id,
            author_id: model.author_id,
            word_id: model.word_id,
            text: model.text,
            like_count: model.like_count,
            date_created: model.date_created.to_rfc3339(),
            word_text: None,
        }
    }

    fn with_word(model: definitions::Model, word: Option<words::Model>) -> Definition {
        Definition {
            word_text: word.map(|word| word.text),
            ..Self::model_to_definition(model)
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Definition>> {
        let definitions = Definitions::find()
            .order_by_asc(definitions::Column::Id)
            .all(self.db)
            .await?;

        Ok(definitions
            .into_iter()
            .map(Self::model_to_definition)
            .collect())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Definition>> {
        let definition_model = Definitions::find_by_id(id).one(self.db).await?;
        Ok(definition_model.map(Self::model_to_definition))
    }

    pub async fn find_by_word_id(&self, word_id: i32) -> Result<Vec<Definition>> {
        let definitions = Definitions::find()
            .filter(definitions::Column::WordId.eq(word_id))
            .order_by_asc(definitions::Column::Id)
            .all(self.db)
            .await?;

        Ok(definitions
            .into_iter()
            .map(Self::model_to_definition)
            .collect())
    }

    /// An author's definitions joined with the word they define, newest first.
    pub async fn find_by_author_with_word(&self, author_id: i32) -> Result<Vec<Definition>> {
        let rows = Definitions::find()
            .find_also_related(Words)
            .filter(definitions::Column::AuthorId.eq(author_id))
            .order_by_desc(definitions::Column::DateCreated)
            .order_by_desc(definitions::Column::Id)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(definition, word)| Self::with_word(definition, word))
            .collect())
    }

    pub async fn count_by_word_id(&self, word_id: i32) -> Result<u64> {
        let count = Definitions::find()
            .filter(definitions::Column::WordId.eq(word_id))
            .count(self.db)
            .await?;

        Ok(count)
    }

    pub async fn create_definition(
        &self,
        author_id: i32,
        word_id: i32,
        text: String,
    ) -> Result<Definition> {
        let definition_model = definitions::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            author_id: sea_orm::ActiveValue::Set(author_id),
            word_id: sea_orm::ActiveValue::Set(word_id),
            text: sea_orm::ActiveValue::Set(text),
            like_count: sea_orm::ActiveValue::Set(0),
            date_created: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        let saved_model = Definitions::insert(definition_model)
            .exec(self.db)
            .await?;

        let created = Definitions::find_by_id(saved_model.last_insert_id)
            .one(self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created definition"))?;

        Ok(Self::model_to_definition(created))
    }

    pub async fn update_text(&self, id: i32, text: String) -> Result<()> {
        Definitions::update_many()
            .col_expr(definitions::Column::Text, Expr::value(text))
            .filter(definitions::Column::Id.eq(id))
            .exec(self.db)
            .await?;
        Ok(())
    }

    pub async fn delete_definition(&self, id: i32) -> Result<bool> {
        let result = Definitions::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Bump like_count in place so concurrent saves never overwrite each other.
    pub async fn increment_like_count(&self, id: i32) -> Result<()> {
        let result = Definitions::update_many()
            .col_expr(
                definitions::Column::LikeCount,
                Expr::col(definitions::Column::LikeCount).add(1),
            )
            .filter(definitions::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            anyhow::bail!("Definition {} vanished while incrementing like_count", id);
        }
        Ok(())
    }

    pub async fn decrement_like_count(&self, id: i32) -> Result<()> {
        let result = Definitions::update_many()
            .col_expr(
                definitions::Column::LikeCount,
                Expr::col(definitions::Column::LikeCount).sub(1),
            )
            .filter(definitions::Column::Id.eq(id))
            .filter(definitions::Column::LikeCount.gt(0))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            anyhow::bail!("like_count of definition {} is already zero", id);
        }
        Ok(())
    }
}
