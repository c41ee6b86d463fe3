use anyhow::Result;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use sea_orm::sea_query::Expr;

use crate::entities::{prelude::*, settings};
use wesaurus_types::Settings as UserSettings;

pub struct SettingsRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SettingsRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn model_to_settings(model: settings::Model) -> UserSettings {
        UserSettings {
            id: model.id,
            user_id: model.user_id,
            dark_mode: model.dark_mode,
        }
    }

    pub async fn create_for_user(&self, user_id: i32) -> Result<UserSettings> {
        let settings_model = settings::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: sea_orm::ActiveValue::Set(user_id),
            dark_mode: sea_orm::ActiveValue::Set(false),
        };

        let saved_model = Settings::insert(settings_model).exec(self.db).await?;

        let created = Settings::find_by_id(saved_model.last_insert_id)
            .one(self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created settings"))?;

        Ok(Self::model_to_settings(created))
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<UserSettings>> {
        let settings_model = Settings::find()
            .filter(settings::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;

        Ok(settings_model.map(Self::model_to_settings))
    }

    /// Returns whether a settings row was updated.
    pub async fn update_dark_mode(&self, user_id: i32, dark_mode: bool) -> Result<bool> {
        let result = Settings::update_many()
            .col_expr(settings::Column::DarkMode, Expr::value(dark_mode))
            .filter(settings::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
