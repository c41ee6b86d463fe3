use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::error::ApiError;
use wesaurus_core::{CollectionScope, Sanitize, assert_owner_or_author, require_field};
use wesaurus_persistence::repositories::{
    DefinitionRepository, SavedDefinitionRepository, SavedWordRepository, WordRepository,
};
use wesaurus_types::{Definition, SaveDefinitionRequest, SaveWordRequest, User, Word};

/// Each user's saved words and saved definitions.
///
/// Every operation is scoped to `/api/users/:user_id` and only the owner of that
/// collection may touch it. Saving a definition also saves its word (implicitly, if
/// the user had not saved it) and bumps the definition's like_count; all of those
/// writes share one transaction, as do the matching writes on unsave.
pub struct CollectionService {
    db: DatabaseConnection,
}

fn saved_word_not_found() -> ApiError {
    ApiError::NotFound("This word does not exist in your dictionary".to_string())
}

fn saved_definition_not_found() -> ApiError {
    ApiError::NotFound("This definition does not exist in your dictionary".to_string())
}

impl CollectionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_saved_words(&self, caller: &User, owner_id: i32) -> Result<Vec<Word>, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        let words = SavedWordRepository::new(&self.db)
            .list_words(caller.id)
            .await?;
        Ok(words.sanitized())
    }

    pub async fn get_saved_word(
        &self,
        caller: &User,
        owner_id: i32,
        word_id: i32,
    ) -> Result<Word, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        SavedWordRepository::new(&self.db)
            .find(caller.id, word_id)
            .await?
            .ok_or_else(saved_word_not_found)?;

        let word = WordRepository::new(&self.db)
            .find_by_id(word_id)
            .await?
            .ok_or_else(saved_word_not_found)?;
        Ok(word.sanitized())
    }

    /// Explicitly save a word to the caller's collection.
    ///
    /// A word that is only in the collection because one of its definitions was
    /// saved gets promoted to an explicit save and the call still succeeds with
    /// 201. Only an already explicit save is rejected as a duplicate.
    pub async fn save_word(
        &self,
        caller: &User,
        owner_id: i32,
        request: SaveWordRequest,
    ) -> Result<Word, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        let word_id = require_field(request.word_id, "word_id")?;

        let txn = self.db.begin().await?;
        let saved_words = SavedWordRepository::new(&txn);
        let existing = saved_words.find(caller.id, word_id).await?;
        if existing.as_ref().is_some_and(|saved| !saved.auto_saved) {
            return Err(ApiError::already_saved("Word"));
        }

        let word = WordRepository::new(&txn)
            .find_by_id(word_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Word does not exist".to_string()))?;

        if existing.is_some() {
            saved_words.mark_explicit(caller.id, word.id).await?;
        } else {
            saved_words
                .insert(caller.id, word.id, false)
                .await
                .map_err(|err| ApiError::or_conflict(err, ApiError::already_saved("Word")))?;
        }
        txn.commit().await?;

        tracing::debug!("User {} saved word {}", caller.id, word.id);
        Ok(word.sanitized())
    }

    pub async fn unsave_word(&self, caller: &User, owner_id: i32, word_id: i32) -> Result<(), ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        let removed = SavedWordRepository::new(&self.db)
            .delete(caller.id, word_id)
            .await?;
        if !removed {
            return Err(saved_word_not_found());
        }

        tracing::debug!("User {} unsaved word {}", caller.id, word_id);
        Ok(())
    }

    pub async fn list_saved_definitions(
        &self,
        caller: &User,
        owner_id: i32,
    ) -> Result<Vec<Definition>, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        let definitions = SavedDefinitionRepository::new(&self.db)
            .list_definitions(caller.id)
            .await?;
        Ok(definitions.sanitized())
    }

    pub async fn get_saved_definition(
        &self,
        caller: &User,
        owner_id: i32,
        definition_id: i32,
    ) -> Result<Definition, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        if !SavedDefinitionRepository::new(&self.db)
            .exists(caller.id, definition_id)
            .await?
        {
            return Err(saved_definition_not_found());
        }

        let definition = DefinitionRepository::new(&self.db)
            .find_by_id(definition_id)
            .await?
            .ok_or_else(saved_definition_not_found)?;
        Ok(definition.sanitized())
    }

    /// Save a definition and return it with its updated like_count.
    pub async fn save_definition(
        &self,
        caller: &User,
        owner_id: i32,
        request: SaveDefinitionRequest,
    ) -> Result<Definition, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        let definition_id = require_field(request.definition_id, "definition_id")?;

        let txn = self.db.begin().await?;
        let saved_definitions = SavedDefinitionRepository::new(&txn);
        if saved_definitions.exists(caller.id, definition_id).await? {
            return Err(ApiError::already_saved("Definition"));
        }

        let definitions = DefinitionRepository::new(&txn);
        let definition = definitions
            .find_by_id(definition_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("This definition does not exist".to_string()))?;

        let saved_words = SavedWordRepository::new(&txn);
        if saved_words.find(caller.id, definition.word_id).await?.is_none() {
            saved_words
                .insert(caller.id, definition.word_id, true)
                .await?;
        }

        saved_definitions
            .insert(caller.id, definition.id)
            .await
            .map_err(|err| ApiError::or_conflict(err, ApiError::already_saved("Definition")))?;
        definitions.increment_like_count(definition.id).await?;

        let saved = definitions
            .find_by_id(definition.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Definition {} vanished mid-save", definition.id))?;
        txn.commit().await?;

        tracing::debug!(
            "User {} saved definition {} (like_count {})",
            caller.id,
            saved.id,
            saved.like_count
        );
        Ok(saved.sanitized())
    }

    pub async fn unsave_definition(
        &self,
        caller: &User,
        owner_id: i32,
        definition_id: i32,
    ) -> Result<(), ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;

        let txn = self.db.begin().await?;
        let saved_definitions = SavedDefinitionRepository::new(&txn);
        if !saved_definitions.delete(caller.id, definition_id).await? {
            return Err(saved_definition_not_found());
        }

        let definitions = DefinitionRepository::new(&txn);
        definitions.decrement_like_count(definition_id).await?;

        let definition = definitions
            .find_by_id(definition_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Definition {} vanished mid-unsave", definition_id))?;

        // Drop the word too when this save was the only reason it was in the list
        let saved_words = SavedWordRepository::new(&txn);
        let implicit_word = saved_words
            .find(caller.id, definition.word_id)
            .await?
            .is_some_and(|saved| saved.auto_saved);
        if implicit_word
            && saved_definitions
                .count_for_word(caller.id, definition.word_id)
                .await?
                == 0
        {
            saved_words.delete(caller.id, definition.word_id).await?;
        }

        txn.commit().await?;

        tracing::debug!("User {} unsaved definition {}", caller.id, definition_id);
        Ok(())
    }
}
