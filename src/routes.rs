use std::sync::Arc;

use log::{debug, error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Reply};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod rejection;
mod response;

pub use internal::*;

/// The largest request body to accept. Video metadata is tiny.
const MAX_CONTENT_LENGTH: usize = 64 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<Box<dyn Reply>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        let status = status_code_for(e);

        if status.is_server_error() {
            error!(logger, "Backend error"; "context" => ?r.context, "error" => ?e, "status" => %status, "message" => %e);
        } else {
            debug!(logger, "Request rejected"; "context" => ?r.context, "status" => %status, "message" => %e);
        }

        let reply: Box<dyn Reply> = match e {
            BackendError::Validation(errors) => Box::new(with_status(json(errors), status)),
            BackendError::NotFound => Box::new(status),
            _ => Box::new(with_status(json(&r.flatten()), status)),
        };

        return Ok(reply);
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        Validation(..) | MalformedBody { .. } => StatusCode::BAD_REQUEST,
        NotFound => StatusCode::NOT_FOUND,
        BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Assembles the public API: every video route, the testing route if
/// enabled, rejection formatting and CORS.
pub fn make_api(
    environment: Environment,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + Send + Sync + 'static {
    let logger = environment.logger.clone();

    let routes = make_version_route(environment.clone())
        .or(make_list_route(environment.clone()))
        .unify()
        .or(make_create_route(environment.clone()))
        .unify()
        .or(make_retrieve_route(environment.clone()))
        .unify()
        .or(make_update_route(environment.clone()))
        .unify()
        .or(make_delete_route(environment.clone()))
        .unify()
        .boxed();

    let routes = if environment.config.enable_testing_routes() {
        routes.or(make_reset_route(environment)).unify().boxed()
    } else {
        routes
    };

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_header("content-type");

    routes
        .recover(move |r| format_rejection(logger.clone(), r))
        .unify()
        .with(cors)
}

mod internal {
    use bytes::Bytes;
    use warp::body;
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{delete, get as g, path as p, path::param as par, post, put};

    use super::handlers;
    use crate::environment::Environment;
    use crate::urls::VIDEOS_PATH;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any()
                .map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    // size is checked by the handlers so that an unknown ID still wins
    fn json_body() -> BoxedFilter<(Bytes,)> {
        body::bytes().boxed()
    }

    route!(make_version_route => version, rt; end(), g());
    route!(make_list_route => list, rt; p(VIDEOS_PATH), end(), g());
    route!(make_create_route => create, rt; p(VIDEOS_PATH), end(), post(), json_body());
    route!(make_retrieve_route => retrieve, rt; p(VIDEOS_PATH), par::<String>(), end(), g());
    route!(make_update_route => update, rt; p(VIDEOS_PATH), par::<String>(), end(), put(), json_body());
    route!(make_delete_route => delete, rt; p(VIDEOS_PATH), par::<String>(), end(), delete());
    route!(make_reset_route => reset, rt; p("testing"), p("all-data"), end(), delete());
}
