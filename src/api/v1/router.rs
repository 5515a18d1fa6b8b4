use super::handler;
use crate::server::*;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::http::Method;
use warp::{Filter, reject};

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// The user routes. Each path matches before its method, so a known path with the
/// wrong method rejects with `MethodNotAllowed` before the body is read.
pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let add = warp::path!("user" / "add")
        .and(warp::post())
        .and(json_body())
        .and(with(server.user_service.clone()))
        .and_then(handler::add_user);

    let get = warp::path!("user" / "get")
        .and(warp::get())
        .and(warp::query::<handler::IdQuery>())
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user);

    let list = warp::path!("user" / "list")
        .and(warp::get())
        .and(with(server.user_service.clone()))
        .and_then(handler::list_users);

    let update = warp::path!("user" / "update")
        .and(warp::put())
        .and(json_body())
        .and(with(server.user_service.clone()))
        .and_then(handler::update_user);

    let delete = warp::path!("user" / "delete")
        .and(warp::delete())
        .and(warp::query::<handler::IdQuery>())
        .and(with(server.user_service.clone()))
        .and_then(handler::delete_user);

    add.or(get).or(list).or(update).or(delete)
}

/// Static files for every GET or HEAD path the user routes leave unclaimed. Any
/// other method falls through as not found rather than `MethodNotAllowed`, which
/// would otherwise shadow the rejection of the user route that did match.
pub fn assets(static_dir: Option<PathBuf>) -> BoxedFilter<(warp::fs::File,)> {
    match static_dir {
        Some(dir) => read_only().and(warp::fs::dir(dir)).boxed(),
        None => warp::any()
            .and_then(|| async { Err::<warp::fs::File, warp::Rejection>(reject::not_found()) })
            .boxed(),
    }
}

fn read_only() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::method()
        .and_then(|method: Method| async move {
            if method == Method::GET || method == Method::HEAD {
                Ok(())
            } else {
                Err(reject::not_found())
            }
        })
        .untuple_one()
}

fn json_body<T: DeserializeOwned + Send>()
-> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
