use std::sync::Arc;

use warp::reply::Response;
use warp::{Filter, Rejection};

use super::{created, json_body, no_content, ok, reject, with_auth, with_service};
use crate::auth::AuthService;
use crate::registry::Registry;
use wesaurus_types::{DefinitionPatch, DefinitionQuery, NewDefinition, User};

pub fn routes(
    registry: Arc<Registry>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let list = warp::path!("api" / "definitions")
        .and(warp::get())
        .and(warp::query::<DefinitionQuery>())
        .and(with_service(registry.clone()))
        .and_then(list_definitions);

    let create = warp::path!("api" / "definitions")
        .and(warp::post())
        .and(with_auth(auth_service.clone()))
        .and(json_body::<NewDefinition>())
        .and(with_service(registry.clone()))
        .and_then(create_definition);

    let show = warp::path!("api" / "definitions" / i32)
        .and(warp::get())
        .and(with_service(registry.clone()))
        .and_then(get_definition);

    let update = warp::path!("api" / "definitions" / i32)
        .and(warp::patch())
        .and(with_auth(auth_service.clone()))
        .and(json_body::<DefinitionPatch>())
        .and(with_service(registry.clone()))
        .and_then(update_definition);

    let delete = warp::path!("api" / "definitions" / i32)
        .and(warp::delete())
        .and(with_auth(auth_service))
        .and(with_service(registry))
        .and_then(delete_definition);

    list.or(create)
        .unify()
        .or(show)
        .unify()
        .or(update)
        .unify()
        .or(delete)
        .unify()
}

async fn list_definitions(
    query: DefinitionQuery,
    registry: Arc<Registry>,
) -> Result<Response, Rejection> {
    let definitions = registry.list_definitions(query).await.map_err(reject)?;
    Ok(ok(&definitions))
}

async fn create_definition(
    caller: User,
    payload: NewDefinition,
    registry: Arc<Registry>,
) -> Result<Response, Rejection> {
    let definition = registry
        .create_definition(&caller, payload)
        .await
        .map_err(reject)?;
    Ok(created(
        format!("/api/definitions/{}", definition.id),
        &definition,
    ))
}

async fn get_definition(id: i32, registry: Arc<Registry>) -> Result<Response, Rejection> {
    let definition = registry.get_definition(id).await.map_err(reject)?;
    Ok(ok(&definition))
}

async fn update_definition(
    id: i32,
    caller: User,
    patch: DefinitionPatch,
    registry: Arc<Registry>,
) -> Result<Response, Rejection> {
    registry
        .update_definition(&caller, id, patch)
        .await
        .map_err(reject)?;
    Ok(no_content())
}

async fn delete_definition(
    id: i32,
    caller: User,
    registry: Arc<Registry>,
) -> Result<Response, Rejection> {
    registry.delete_definition(&caller, id).await.map_err(reject)?;
    Ok(no_content())
}
