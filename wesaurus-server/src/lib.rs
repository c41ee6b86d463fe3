use std::sync::Arc;
use warp::Filter;

use crate::auth::AuthService;
use crate::collections::CollectionService;
use crate::config::Config;
use crate::registry::Registry;
use crate::settings::SettingsService;

pub mod auth;
pub mod collections;
pub mod config;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod settings;

pub fn create_routes(
    config: Config,
    auth_service: Arc<AuthService>,
    registry: Arc<Registry>,
    collections: Arc<CollectionService>,
    settings: Arc<SettingsService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    let api = handlers::auth::routes(auth_service.clone())
        .or(handlers::users::routes(auth_service.clone()))
        .unify()
        .or(handlers::words::routes(registry.clone(), auth_service.clone()))
        .unify()
        .or(handlers::definitions::routes(registry, auth_service.clone()))
        .unify()
        .or(handlers::collections::routes(collections, auth_service.clone()))
        .unify()
        .or(handlers::settings::routes(settings, auth_service))
        .unify();

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .expose_headers(vec!["location"]);

    let expose_internal_errors = config.expose_internal_errors();

    health
        .or(api)
        .recover(move |err| handlers::handle_rejection(err, expose_internal_errors))
        .with(cors)
        .with(warp::log("wesaurus"))
}
