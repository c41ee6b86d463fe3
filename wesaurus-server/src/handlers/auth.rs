use std::sync::Arc;

use warp::reply::Response;
use warp::{Filter, Rejection};

use super::{json_body, ok, reject, with_auth, with_service};
use crate::auth::AuthService;
use wesaurus_types::{LoginRequest, User};

pub fn routes(
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(json_body::<LoginRequest>())
        .and(with_service(auth_service.clone()))
        .and_then(login);

    let refresh = warp::path!("api" / "auth" / "refresh")
        .and(warp::post())
        .and(with_auth(auth_service.clone()))
        .and(with_service(auth_service))
        .and_then(refresh);

    login.or(refresh).unify()
}

async fn login(request: LoginRequest, auth_service: Arc<AuthService>) -> Result<Response, Rejection> {
    let token = auth_service.login(request).await.map_err(reject)?;
    Ok(ok(&token))
}

async fn refresh(caller: User, auth_service: Arc<AuthService>) -> Result<Response, Rejection> {
    let token = auth_service.refresh(&caller).map_err(reject)?;
    Ok(ok(&token))
}
