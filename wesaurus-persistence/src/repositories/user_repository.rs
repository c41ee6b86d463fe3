use anyhow::Result;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{prelude::*, users};
use wesaurus_types::User;

/// Accounts. Works against a plain connection or an open transaction.
pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

/// A stored account together with its password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            date_created: model.date_created.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        Ok(self
            .find_credentials(user_name)
            .await?
            .map(|credentials| credentials.user))
    }

    pub async fn find_credentials(&self, user_name: &str) -> Result<Option<UserCredentials>> {
        let user_model = Users::find()
            .filter(users::Column::UserName.eq(user_name))
            .one(self.db)
            .await?;

        Ok(user_model.map(|model| {
            let password_hash = model.password.clone();
            UserCredentials {
                user: Self::model_to_user(model),
                password_hash,
            }
        }))
    }

    pub async fn has_user_with_user_name(&self, user_name: &str) -> Result<bool> {
        Ok(self.find_by_user_name(user_name).await?.is_some())
    }

    pub async fn has_user_with_email(&self, email: &str) -> Result<bool> {
        let user_model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(user_model.is_some())
    }

    pub async fn create_user(
        &self,
        user_name: String,
        email: String,
        password_hash: String,
    ) -> Result<User> {
        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_name: sea_orm::ActiveValue::Set(user_name),
            email: sea_orm::ActiveValue::Set(email),
            password: sea_orm::ActiveValue::Set(password_hash),
            date_created: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        let saved_model = Users::insert(user_model).exec(self.db).await?;

        // Fetch the created user
        let created_user = Users::find_by_id(saved_model.last_insert_id)
            .one(self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(Self::model_to_user(created_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::setup_test_db;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        let created = repo
            .create_user(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "$argon2id$hash".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(created.user_name, "alice");
        assert_eq!(created.email, "alice@example.com");

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);

        let credentials = repo.find_credentials("alice").await.unwrap().unwrap();
        assert_eq!(credentials.user.id, created.id);
        assert_eq!(credentials.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_uniqueness_lookups() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        repo.create_user(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        )
        .await
        .unwrap();

        assert!(repo.has_user_with_user_name("alice").await.unwrap());
        assert!(!repo.has_user_with_user_name("Alice").await.unwrap());
        assert!(repo.has_user_with_email("alice@example.com").await.unwrap());
        assert!(!repo.has_user_with_email("bob@example.com").await.unwrap());
        assert!(repo.find_by_user_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_is_rejected_by_store() {
        let db = setup_test_db().await;
        let repo = UserRepository::new(&db);

        repo.create_user("alice".into(), "a@example.com".into(), "hash".into())
            .await
            .unwrap();
        let result = repo
            .create_user("alice".into(), "b@example.com".into(), "hash".into())
            .await;
        assert!(result.is_err());
    }
}
