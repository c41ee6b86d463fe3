use std::sync::Arc;

use warp::reply::Response;
use warp::{Filter, Rejection};

use super::{created, json_body, no_content, ok, reject, with_auth, with_service};
use crate::auth::AuthService;
use crate::collections::CollectionService;
use wesaurus_types::{SaveDefinitionRequest, SaveWordRequest, User};

/// `/api/users/:user_id/words` and `/api/users/:user_id/definitions`. All of them
/// require the caller to own the collection.
pub fn routes(
    collections: Arc<CollectionService>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let list_words = warp::path!("api" / "users" / i32 / "words")
        .and(warp::get())
        .and(with_auth(auth_service.clone()))
        .and(with_service(collections.clone()))
        .and_then(list_saved_words);

    let save_word = warp::path!("api" / "users" / i32 / "words")
        .and(warp::post())
        .and(with_auth(auth_service.clone()))
        .and(json_body::<SaveWordRequest>())
        .and(with_service(collections.clone()))
        .and_then(save_word);

    let show_word = warp::path!("api" / "users" / i32 / "words" / i32)
        .and(warp::get())
        .and(with_auth(auth_service.clone()))
        .and(with_service(collections.clone()))
        .and_then(get_saved_word);

    let unsave_word = warp::path!("api" / "users" / i32 / "words" / i32)
        .and(warp::delete())
        .and(with_auth(auth_service.clone()))
        .and(with_service(collections.clone()))
        .and_then(unsave_word);

    let list_definitions = warp::path!("api" / "users" / i32 / "definitions")
        .and(warp::get())
        .and(with_auth(auth_service.clone()))
        .and(with_service(collections.clone()))
        .and_then(list_saved_definitions);

    let save_definition = warp::path!("api" / "users" / i32 / "definitions")
        .and(warp::post())
        .and(with_auth(auth_service.clone()))
        .and(json_body::<SaveDefinitionRequest>())
        .and(with_service(collections.clone()))
        .and_then(save_definition);

    let show_definition = warp::path!("api" / "users" / i32 / "definitions" / i32)
        .and(warp::get())
        .and(with_auth(auth_service.clone()))
        .and(with_service(collections.clone()))
        .and_then(get_saved_definition);

    let unsave_definition = warp::path!("api" / "users" / i32 / "definitions" / i32)
        .and(warp::delete())
        .and(with_auth(auth_service))
        .and(with_service(collections))
        .and_then(unsave_definition);

    list_words
        .or(save_word)
        .unify()
        .or(show_word)
        .unify()
        .or(unsave_word)
        .unify()
        .or(list_definitions)
        .unify()
        .or(save_definition)
        .unify()
        .or(show_definition)
        .unify()
        .or(unsave_definition)
        .unify()
}

async fn list_saved_words(
    user_id: i32,
    caller: User,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    let words = collections
        .list_saved_words(&caller, user_id)
        .await
        .map_err(reject)?;
    Ok(ok(&words))
}

async fn save_word(
    user_id: i32,
    caller: User,
    request: SaveWordRequest,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    let word = collections
        .save_word(&caller, user_id, request)
        .await
        .map_err(reject)?;
    Ok(created(
        format!("/api/users/{}/words/{}", user_id, word.id),
        &word,
    ))
}

async fn get_saved_word(
    user_id: i32,
    word_id: i32,
    caller: User,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    let word = collections
        .get_saved_word(&caller, user_id, word_id)
        .await
        .map_err(reject)?;
    Ok(ok(&word))
}

async fn unsave_word(
    user_id: i32,
    word_id: i32,
    caller: User,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    collections
        .unsave_word(&caller, user_id, word_id)
        .await
        .map_err(reject)?;
    Ok(no_content())
}

async fn list_saved_definitions(
    user_id: i32,
    caller: User,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    let definitions = collections
        .list_saved_definitions(&caller, user_id)
        .await
        .map_err(reject)?;
    Ok(ok(&definitions))
}

async fn save_definition(
    user_id: i32,
    caller: User,
    request: SaveDefinitionRequest,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    let definition = collections
        .save_definition(&caller, user_id, request)
        .await
        .map_err(reject)?;
    Ok(created(
        format!("/api/users/{}/definitions/{}", user_id, definition.id),
        &definition,
    ))
}

async fn get_saved_definition(
    user_id: i32,
    definition_id: i32,
    caller: User,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    let definition = collections
        .get_saved_definition(&caller, user_id, definition_id)
        .await
        .map_err(reject)?;
    Ok(ok(&definition))
}

async fn unsave_definition(
    user_id: i32,
    definition_id: i32,
    caller: User,
    collections: Arc<CollectionService>,
) -> Result<Response, Rejection> {
    collections
        .unsave_definition(&caller, user_id, definition_id)
        .await
        .map_err(reject)?;
    Ok(no_content())
}
