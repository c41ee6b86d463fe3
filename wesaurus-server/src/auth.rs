use std::time::{SystemTime, UNIX_EPOCH};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ApiError;
use wesaurus_core::{Sanitize, require_field, require_non_empty, validate_email, validate_password};
use wesaurus_persistence::repositories::{SettingsRepository, UserRepository};
use wesaurus_types::{AuthToken, LoginRequest, NewUser, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_name
    pub user_id: i32,
    pub iat: u64,
    pub exp: u64,
}

/// Identity and token service: registration, credential checks, and bearer tokens.
pub struct AuthService {
    db: DatabaseConnection,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, jwt_secret: &str, expiry_seconds: u64) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            expiry_seconds,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::new(db, &config.jwt_secret, config.jwt_expiry_seconds)
    }

    pub async fn register(&self, new_user: NewUser) -> Result<User, ApiError> {
        let email = require_non_empty(new_user.email, "email")?;
        let user_name = require_non_empty(new_user.user_name, "user_name")?;
        let password = require_non_empty(new_user.password, "password")?;

        validate_password(&password)?;
        validate_email(&email)?;

        let users = UserRepository::new(&self.db);
        if users.has_user_with_user_name(&user_name).await? {
            return Err(ApiError::Duplicate("Username already taken".to_string()));
        }
        if users.has_user_with_email(&email).await? {
            return Err(ApiError::Duplicate(
                "A user is already registered with this email address".to_string(),
            ));
        }

        let password_hash = hash_password(password).await?;

        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn)
            .create_user(user_name, email, password_hash)
            .await?;
        SettingsRepository::new(&txn).create_for_user(user.id).await?;
        txn.commit().await?;

        tracing::debug!("Registered user {} ({})", user.user_name, user.id);
        Ok(user.sanitized())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthToken, ApiError> {
        let user_name = require_field(request.user_name, "user_name")?;
        let password = require_field(request.password, "password")?;

        let credentials = UserRepository::new(&self.db)
            .find_credentials(&user_name)
            .await?
            .ok_or_else(ApiError::invalid_credentials)?;

        if !verify_password(password, credentials.password_hash).await? {
            tracing::debug!("Rejected login for {}", user_name);
            return Err(ApiError::invalid_credentials());
        }

        Ok(AuthToken {
            auth_token: self.issue_token(&credentials.user)?,
        })
    }

    /// Re-issue a token for a caller that already holds a valid one.
    pub fn refresh(&self, user: &User) -> Result<AuthToken, ApiError> {
        Ok(AuthToken {
            auth_token: self.issue_token(user)?,
        })
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(anyhow::Error::from)?
            .as_secs();
        let claims = Claims {
            sub: user.user_name.clone(),
            user_id: user.id,
            iat: now,
            exp: now + self.expiry_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(e.into()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Resolve an `Authorization` header to a stored user.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<User, ApiError> {
        let token = bearer_token(header.unwrap_or_default()).ok_or(AuthError::MissingToken)?;

        let claims = self.verify_token(token).map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            e
        })?;

        let user = UserRepository::new(&self.db)
            .find_by_user_name(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Token subject '{}' does not resolve to a user", claims.sub);
                AuthError::UnknownSubject
            })?;

        Ok(user)
    }
}

/// Strip a case-insensitive `Bearer ` prefix.
fn bearer_token(header: &str) -> Option<&str> {
    const PREFIX: &str = "bearer ";
    match header.get(..PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(PREFIX) => Some(&header[PREFIX.len()..]),
        _ => None,
    }
}

/// Hash a password with Argon2id off the async executor. Returns a PHC-format string.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
    })
    .await
    .map_err(anyhow::Error::from)?
    .map_err(ApiError::from)
}

/// Check a password against a stored PHC-format hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
        Ok::<_, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .map_err(anyhow::Error::from)?
    .map_err(ApiError::from)
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject does not resolve to a user")]
    UnknownSubject,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::missing_bearer_token(),
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UnknownSubject => {
                ApiError::unauthorized()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use wesaurus_persistence::connection::connect_to_memory_database;

    async fn setup_auth_service() -> AuthService {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        AuthService::new(db, "test-secret", 60)
    }

    fn new_user(user_name: &str, email: &str, password: &str) -> NewUser {
        NewUser {
            user_name: Some(user_name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_bearer_prefix() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[tokio::test]
    async fn test_password_hash_round_trip() {
        let hash = hash_password("11AAaa!!".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("11AAaa!!".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("11AAaa!?".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_register_login_authenticate() {
        let auth = setup_auth_service().await;

        let user = auth
            .register(new_user("alice", "alice@example.com", "11AAaa!!"))
            .await
            .unwrap();
        assert_eq!(user.user_name, "alice");

        let token = auth
            .login(LoginRequest {
                user_name: Some("alice".into()),
                password: Some("11AAaa!!".into()),
            })
            .await
            .unwrap();

        let claims = auth.verify_token(&token.auth_token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.user_id, user.id);

        let header = format!("Bearer {}", token.auth_token);
        let resolved = auth.authenticate(Some(&header)).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let auth = setup_auth_service().await;
        auth.register(new_user("alice", "alice@example.com", "11AAaa!!"))
            .await
            .unwrap();

        let unknown = auth
            .login(LoginRequest {
                user_name: Some("mallory".into()),
                password: Some("11AAaa!!".into()),
            })
            .await
            .unwrap_err();
        let wrong = auth
            .login(LoginRequest {
                user_name: Some("alice".into()),
                password: Some("wrong".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), "Incorrect username or password");
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_checked_before_email() {
        let auth = setup_auth_service().await;
        auth.register(new_user("alice", "alice@example.com", "11AAaa!!"))
            .await
            .unwrap();

        let both = auth
            .register(new_user("alice", "alice@example.com", "11AAaa!!"))
            .await
            .unwrap_err();
        assert_eq!(both.to_string(), "Username already taken");

        let email = auth
            .register(new_user("alice2", "alice@example.com", "11AAaa!!"))
            .await
            .unwrap_err();
        assert_eq!(
            email.to_string(),
            "A user is already registered with this email address"
        );
    }

    #[tokio::test]
    async fn test_authenticate_rejections() {
        let auth = setup_auth_service().await;

        let missing = auth.authenticate(None).await.unwrap_err();
        assert_eq!(missing.to_string(), "Missing bearer token");

        let garbage = auth.authenticate(Some("Bearer garbage")).await.unwrap_err();
        assert_eq!(garbage.to_string(), "Unauthorized request");

        // Well-signed token for a user that does not exist
        let ghost = User {
            id: 99,
            user_name: "ghost".into(),
            email: "ghost@example.com".into(),
            date_created: chrono::Utc::now().to_rfc3339(),
        };
        let token = auth.issue_token(&ghost).unwrap();
        let header = format!("Bearer {}", token);
        let unknown = auth.authenticate(Some(&header)).await.unwrap_err();
        assert_eq!(unknown.to_string(), "Unauthorized request");

        // Token signed with another secret
        let other = AuthService::new(auth.db.clone(), "other-secret", 60);
        let forged = other.issue_token(&ghost).unwrap();
        assert!(matches!(
            auth.verify_token(&forged),
            Err(AuthError::InvalidToken)
        ));
    }
}
