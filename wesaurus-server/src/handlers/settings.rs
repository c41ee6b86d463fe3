use std::sync::Arc;

use warp::reply::Response;
use warp::{Filter, Rejection};

use super::{json_body, no_content, ok, reject, with_auth, with_service};
use crate::auth::AuthService;
use crate::settings::SettingsService;
use wesaurus_types::{SettingsPatch, User};

pub fn routes(
    settings: Arc<SettingsService>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let show = warp::path!("api" / "users" / i32 / "settings")
        .and(warp::get())
        .and(with_auth(auth_service.clone()))
        .and(with_service(settings.clone()))
        .and_then(get_settings);

    let update = warp::path!("api" / "users" / i32 / "settings")
        .and(warp::patch())
        .and(with_auth(auth_service))
        .and(json_body::<SettingsPatch>())
        .and(with_service(settings))
        .and_then(update_settings);

    show.or(update).unify()
}

async fn get_settings(
    user_id: i32,
    caller: User,
    settings: Arc<SettingsService>,
) -> Result<Response, Rejection> {
    let current = settings
        .get_settings(&caller, user_id)
        .await
        .map_err(reject)?;
    Ok(ok(&current))
}

async fn update_settings(
    user_id: i32,
    caller: User,
    patch: SettingsPatch,
    settings: Arc<SettingsService>,
) -> Result<Response, Rejection> {
    settings
        .update_settings(&caller, user_id, patch)
        .await
        .map_err(reject)?;
    Ok(no_content())
}
