use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use wesaurus_core::{CollectionScope, assert_owner_or_author, require_patch_field};
use wesaurus_persistence::repositories::SettingsRepository;
use wesaurus_types::{Settings, SettingsPatch, User};

pub struct SettingsService {
    db: DatabaseConnection,
}

fn settings_not_found() -> ApiError {
    ApiError::NotFound("Settings do not exist".to_string())
}

impl SettingsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_settings(&self, caller: &User, owner_id: i32) -> Result<Settings, ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        SettingsRepository::new(&self.db)
            .find_by_user_id(caller.id)
            .await?
            .ok_or_else(settings_not_found)
    }

    /// Apply a settings patch. `dark_mode` must be present; `false` is a valid value.
    pub async fn update_settings(
        &self,
        caller: &User,
        owner_id: i32,
        patch: SettingsPatch,
    ) -> Result<(), ApiError> {
        assert_owner_or_author(&CollectionScope(owner_id), caller)?;
        let dark_mode = require_patch_field(patch.dark_mode, "dark_mode")?;

        let updated = SettingsRepository::new(&self.db)
            .update_dark_mode(caller.id, dark_mode)
            .await?;
        if !updated {
            return Err(settings_not_found());
        }

        tracing::debug!("User {} set dark_mode={}", caller.id, dark_mode);
        Ok(())
    }
}
