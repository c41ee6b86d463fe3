use std::sync::Arc;

use warp::reply::Response;
use warp::{Filter, Rejection};

use super::{created, json_body, no_content, ok, reject, with_auth, with_service};
use crate::auth::AuthService;
use crate::registry::Registry;
use wesaurus_types::{User, WordPayload};

/// Reads are public; every write needs a bearer token.
pub fn routes(
    registry: Arc<Registry>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let list = warp::path!("api" / "words")
        .and(warp::get())
        .and(with_service(registry.clone()))
        .and_then(list_words);

    let create = warp::path!("api" / "words")
        .and(warp::post())
        .and(with_auth(auth_service.clone()))
        .and(json_body::<WordPayload>())
        .and(with_service(registry.clone()))
        .and_then(create_word);

    let show = warp::path!("api" / "words" / i32)
        .and(warp::get())
        .and(with_service(registry.clone()))
        .and_then(get_word);

    let update = warp::path!("api" / "words" / i32)
        .and(warp::patch())
        .and(with_auth(auth_service.clone()))
        .and(json_body::<WordPayload>())
        .and(with_service(registry.clone()))
        .and_then(update_word);

    let delete = warp::path!("api" / "words" / i32)
        .and(warp::delete())
        .and(with_auth(auth_service))
        .and(with_service(registry))
        .and_then(delete_word);

    list.or(create)
        .unify()
        .or(show)
        .unify()
        .or(update)
        .unify()
        .or(delete)
        .unify()
}

async fn list_words(registry: Arc<Registry>) -> Result<Response, Rejection> {
    let words = registry.list_words().await.map_err(reject)?;
    Ok(ok(&words))
}

async fn create_word(
    caller: User,
    payload: WordPayload,
    registry: Arc<Registry>,
) -> Result<Response, Rejection> {
    let word = registry.create_word(payload).await.map_err(reject)?;
    tracing::debug!("Word {} submitted by user {}", word.id, caller.id);
    Ok(created(format!("/api/words/{}", word.id), &word))
}

async fn get_word(id: i32, registry: Arc<Registry>) -> Result<Response, Rejection> {
    let word = registry.get_word(id).await.map_err(reject)?;
    Ok(ok(&word))
}

async fn update_word(
    id: i32,
    _caller: User,
    payload: WordPayload,
    registry: Arc<Registry>,
) -> Result<Response, Rejection> {
    registry.update_word(id, payload).await.map_err(reject)?;
    Ok(no_content())
}

async fn delete_word(id: i32, _caller: User, registry: Arc<Registry>) -> Result<Response, Rejection> {
    registry.delete_word(id).await.map_err(reject)?;
    Ok(no_content())
}
