use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::auth::AuthService;
use crate::error::ApiError;
use wesaurus_types::{ErrorEnvelope, User};

pub mod auth;
pub mod collections;
pub mod definitions;
pub mod settings;
pub mod users;
pub mod words;

/// Hand a shared service to the handler.
pub fn with_service<T>(service: Arc<T>) -> impl Filter<Extract = (Arc<T>,), Error = Infallible> + Clone
where
    T: Send + Sync + 'static,
{
    warp::any().map(move || service.clone())
}

/// Resolve the `Authorization` header to the calling user, or reject with a 401.
pub fn with_auth(
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(with_service(auth_service))
        .and_then(|header: Option<String>, auth_service: Arc<AuthService>| async move {
            auth_service
                .authenticate(header.as_deref())
                .await
                .map_err(warp::reject::custom)
        })
}

/// Decode a JSON request body. An empty body reads as `{}` so missing fields get
/// their own message.
pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::bytes().and_then(|body: Bytes| async move {
        parse_json::<T>(&body).map_err(warp::reject::custom)
    })
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::Validation("Request body must be valid JSON".to_string())
    })
}

pub fn reject(err: ApiError) -> Rejection {
    warp::reject::custom(err)
}

pub fn ok<T: Serialize>(value: &T) -> Response {
    warp::reply::json(value).into_response()
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, value: &T) -> Response {
    let reply = warp::reply::with_status(warp::reply::json(value), StatusCode::CREATED);
    warp::reply::with_header(reply, "location", location).into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

fn error_reply(message: &str, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorEnvelope::new(message)), status)
        .into_response()
}

/// Render every rejection that escapes the route tree as a JSON error.
pub async fn handle_rejection(
    err: Rejection,
    expose_internal_errors: bool,
) -> Result<Response, Infallible> {
    if let Some(api_error) = err.find::<ApiError>() {
        return Ok(api_error.to_response(expose_internal_errors));
    }

    if err.is_not_found() {
        return Ok(error_reply("Not found", StatusCode::NOT_FOUND));
    }

    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(
            "Method not allowed",
            StatusCode::METHOD_NOT_ALLOWED,
        ));
    }

    if err.find::<warp::reject::InvalidQuery>().is_some() {
        return Ok(error_reply("Invalid query string", StatusCode::BAD_REQUEST));
    }

    if err.find::<warp::reject::InvalidHeader>().is_some() {
        return Ok(ApiError::unauthorized().to_response(expose_internal_errors));
    }

    tracing::error!("Unhandled rejection: {:?}", err);
    Ok(ApiError::Internal(anyhow::anyhow!("Unhandled rejection: {:?}", err))
        .to_response(expose_internal_errors))
}
