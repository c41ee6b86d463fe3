use std::sync::Arc;

use warp::reply::Response;
use warp::{Filter, Rejection};

use super::{created, json_body, reject, with_service};
use crate::auth::AuthService;
use wesaurus_types::NewUser;

pub fn routes(
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path!("api" / "users")
        .and(warp::post())
        .and(json_body::<NewUser>())
        .and(with_service(auth_service))
        .and_then(register)
}

async fn register(new_user: NewUser, auth_service: Arc<AuthService>) -> Result<Response, Rejection> {
    let user = auth_service.register(new_user).await.map_err(reject)?;
    Ok(created(format!("/api/users/{}", user.id), &user))
}
