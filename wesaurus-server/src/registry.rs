use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::error::ApiError;
use wesaurus_core::{
    Sanitize, assert_owner_or_author, require_field, require_not_blank, require_patch_field,
};
use wesaurus_persistence::repositories::{
    DefinitionRepository, SavedDefinitionRepository, SavedWordRepository, WordRepository,
};
use wesaurus_types::{
    Definition, DefinitionPatch, DefinitionQuery, NewDefinition, User, Word, WordPayload,
};

/// Canonical words and definitions shared by every user.
pub struct Registry {
    db: DatabaseConnection,
}

fn word_not_found() -> ApiError {
    ApiError::NotFound("Word does not exist".to_string())
}

fn definition_not_found() -> ApiError {
    ApiError::NotFound("Definition doesn't exist".to_string())
}

impl Registry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_words(&self) -> Result<Vec<Word>, ApiError> {
        let words = WordRepository::new(&self.db).find_all().await?;
        Ok(words.sanitized())
    }

    pub async fn get_word(&self, id: i32) -> Result<Word, ApiError> {
        let word = WordRepository::new(&self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(word_not_found)?;
        Ok(word.sanitized())
    }

    pub async fn create_word(&self, payload: WordPayload) -> Result<Word, ApiError> {
        let text = require_field(payload.text, "text")?;
        require_not_blank(&text, "text")?;

        let txn = self.db.begin().await?;
        let words = WordRepository::new(&txn);
        if words.find_by_text(&text).await?.is_some() {
            return Err(ApiError::Duplicate("Word already exists".to_string()));
        }
        let word = words.create_word(text).await.map_err(|err| {
            ApiError::or_conflict(err, ApiError::Duplicate("Word already exists".to_string()))
        })?;
        txn.commit().await?;

        tracing::debug!("Created word {} ({})", word.text, word.id);
        Ok(word.sanitized())
    }

    pub async fn update_word(&self, id: i32, payload: WordPayload) -> Result<(), ApiError> {
        let txn = self.db.begin().await?;
        let words = WordRepository::new(&txn);
        let word = words.find_by_id(id).await?.ok_or_else(word_not_found)?;

        let text = require_patch_field(payload.text, "text")?;
        require_not_blank(&text, "text")?;
        ensure_word_unreferenced(&txn, word.id, "update").await?;

        if let Some(existing) = words.find_by_text(&text).await? {
            if existing.id != word.id {
                return Err(ApiError::Duplicate("Word already exists".to_string()));
            }
        }

        words.update_text(word.id, text).await.map_err(|err| {
            ApiError::or_conflict(err, ApiError::Duplicate("Word already exists".to_string()))
        })?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn delete_word(&self, id: i32) -> Result<(), ApiError> {
        let txn = self.db.begin().await?;
        let words = WordRepository::new(&txn);
        let word = words.find_by_id(id).await?.ok_or_else(word_not_found)?;

        ensure_word_unreferenced(&txn, word.id, "delete").await?;

        words.delete_word(word.id).await?;
        txn.commit().await?;

        tracing::debug!("Deleted word {}", word.id);
        Ok(())
    }

    pub async fn list_definitions(&self, query: DefinitionQuery) -> Result<Vec<Definition>, ApiError> {
        let definitions = DefinitionRepository::new(&self.db);
        let listed = match query {
            DefinitionQuery {
                author_id: Some(author_id),
                ..
            } => {
                let authored = definitions.find_by_author_with_word(author_id).await?;
                match query.word_id {
                    Some(word_id) => authored
                        .into_iter()
                        .filter(|definition| definition.word_id == word_id)
                        .collect(),
                    None => authored,
                }
            }
            DefinitionQuery {
                word_id: Some(word_id),
                ..
            } => definitions.find_by_word_id(word_id).await?,
            _ => definitions.find_all().await?,
        };
        Ok(listed.sanitized())
    }

    pub async fn get_definition(&self, id: i32) -> Result<Definition, ApiError> {
        let definition = DefinitionRepository::new(&self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(definition_not_found)?;
        Ok(definition.sanitized())
    }

    /// Create a definition authored by the caller.
    pub async fn create_definition(
        &self,
        caller: &User,
        payload: NewDefinition,
    ) -> Result<Definition, ApiError> {
        let word_id = require_field(payload.word_id, "word_id")?;
        let text = require_field(payload.text, "text")?;
        require_not_blank(&text, "text")?;

        let txn = self.db.begin().await?;
        WordRepository::new(&txn)
            .find_by_id(word_id)
            .await?
            .ok_or_else(word_not_found)?;
        let definition = DefinitionRepository::new(&txn)
            .create_definition(caller.id, word_id, text)
            .await?;
        txn.commit().await?;

        tracing::debug!(
            "User {} defined word {} as definition {}",
            caller.id,
            word_id,
            definition.id
        );
        Ok(definition.sanitized())
    }

    pub async fn update_definition(
        &self,
        caller: &User,
        id: i32,
        patch: DefinitionPatch,
    ) -> Result<(), ApiError> {
        let definitions = DefinitionRepository::new(&self.db);
        let definition = definitions
            .find_by_id(id)
            .await?
            .ok_or_else(definition_not_found)?;
        assert_owner_or_author(&definition, caller)?;

        let text = require_patch_field(patch.text, "text")?;
        require_not_blank(&text, "text")?;

        definitions.update_text(definition.id, text).await?;
        Ok(())
    }

    /// Delete a definition. Savers lose it from their collections, and a word that was
    /// only implicitly saved through it goes with it.
    pub async fn delete_definition(&self, caller: &User, id: i32) -> Result<(), ApiError> {
        let txn = self.db.begin().await?;
        let definitions = DefinitionRepository::new(&txn);
        let definition = definitions
            .find_by_id(id)
            .await?
            .ok_or_else(definition_not_found)?;
        assert_owner_or_author(&definition, caller)?;

        let saved_definitions = SavedDefinitionRepository::new(&txn);
        let saved_words = SavedWordRepository::new(&txn);
        for user_id in saved_definitions.find_user_ids(definition.id).await? {
            let implicit_word = saved_words
                .find(user_id, definition.word_id)
                .await?
                .is_some_and(|saved| saved.auto_saved);
            let other_saves = saved_definitions
                .count_for_word(user_id, definition.word_id)
                .await?
                .saturating_sub(1);
            if implicit_word && other_saves == 0 {
                saved_words.delete(user_id, definition.word_id).await?;
            }
        }

        definitions.delete_definition(definition.id).await?;
        txn.commit().await?;

        tracing::debug!("User {} deleted definition {}", caller.id, definition.id);
        Ok(())
    }
}

async fn ensure_word_unreferenced<C: ConnectionTrait>(
    db: &C,
    word_id: i32,
    action: &str,
) -> Result<(), ApiError> {
    if DefinitionRepository::new(db).count_by_word_id(word_id).await? > 0 {
        return Err(ApiError::word_in_use(action));
    }
    Ok(())
}
