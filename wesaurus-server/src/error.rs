use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use wesaurus_core::{
    BlankField, EmptyPatch, InvalidEmail, MissingField, OwnershipError, PasswordError,
};
use wesaurus_types::{AuthErrorBody, ErrorEnvelope, ErrorMessage, InternalErrorBody};

/// Every failure a request can end in. The message is what the client sees.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Integrity(String),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn missing_bearer_token() -> Self {
        ApiError::Authentication("Missing bearer token".to_string())
    }

    pub fn unauthorized() -> Self {
        ApiError::Authentication("Unauthorized request".to_string())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Validation("Incorrect username or password".to_string())
    }

    pub fn already_saved(what: &str) -> Self {
        ApiError::Duplicate(format!("{} already exists in your dictionary", what))
    }

    pub fn word_in_use(action: &str) -> Self {
        ApiError::Integrity(format!(
            "Cannot {} a word with existing definitions",
            action
        ))
    }

    /// Report a unique-key failure on insert as `conflict`.
    ///
    /// Two requests can both pass the existence check and race to insert; the
    /// loser should see the same 400 as a sequential duplicate, not a 500.
    pub fn or_conflict(err: anyhow::Error, conflict: ApiError) -> ApiError {
        if is_unique_violation(&err) {
            conflict
        } else {
            ApiError::Internal(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Duplicate(_) | ApiError::Integrity(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as a JSON response.
    pub fn to_response(&self, expose_internal_errors: bool) -> Response {
        let status = self.status();
        match self {
            ApiError::Authentication(message) => warp::reply::with_status(
                warp::reply::json(&AuthErrorBody {
                    error: message.clone(),
                }),
                status,
            )
            .into_response(),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                if expose_internal_errors {
                    let message = err.to_string();
                    warp::reply::with_status(
                        warp::reply::json(&InternalErrorBody {
                            message: message.clone(),
                            error: ErrorMessage { message },
                        }),
                        status,
                    )
                    .into_response()
                } else {
                    warp::reply::with_status(
                        warp::reply::json(&ErrorEnvelope::new("server error")),
                        status,
                    )
                    .into_response()
                }
            }
            other => warp::reply::with_status(
                warp::reply::json(&ErrorEnvelope::new(other.to_string())),
                status,
            )
            .into_response(),
        }
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(|db_err| db_err.sql_err())
        .is_some_and(|sql_err| matches!(sql_err, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<MissingField> for ApiError {
    fn from(err: MissingField) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<EmptyPatch> for ApiError {
    fn from(err: EmptyPatch) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<BlankField> for ApiError {
    fn from(err: BlankField) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<InvalidEmail> for ApiError {
    fn from(err: InvalidEmail) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<OwnershipError> for ApiError {
    fn from(err: OwnershipError) -> Self {
        ApiError::Authorization(err.to_string())
    }
}
