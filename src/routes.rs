use std::convert::Infallible;

use log::{debug, error, info};
use warp::filters::BoxedFilter;
use warp::http::header::{HeaderMap, HeaderValue};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, Reply, WithStatus};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod rejection;
mod response;

pub use internal::*;
pub use rejection::{Context, FlattenedRejection, Rejection};

/// The fully assembled API.
pub type Api = BoxedFilter<(Box<dyn Reply>,)>;

/// Assembles every route along with the recovery, CORS, security
/// header and request logging layers.
pub fn make_api(environment: Environment) -> Api {
    let recovery_environment = environment.clone();
    let logger = environment.logger.clone();

    let cors = warp::cors()
        .allow_origins(
            environment
                .config
                .allowed_origins()
                .iter()
                .map(String::as_str),
        )
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["content-type"])
        .allow_credentials(true);

    let request_log = warp::log::custom(move |request: warp::log::Info| {
        info!(logger, "Request";
            "method" => %request.method(),
            "path" => request.path(),
            "status" => request.status().as_u16(),
            "elapsed_ms" => request.elapsed().as_secs_f64() * 1000.0);
    });

    // specific paths must come before the catch-all ID lookup
    admin::make_index_route()
        .or(admin::make_health_route(environment.clone()))
        .or(make_search_route(environment.clone()))
        .or(make_category_route(environment.clone()))
        .or(make_location_route(environment.clone()))
        .or(make_listings_route(environment.clone()))
        .or(make_categories_route(environment.clone()))
        .or(make_retrieve_route(environment))
        .recover(move |r| format_rejection(recovery_environment.clone(), r))
        .with(warp::reply::with::headers(security_headers()))
        .with(cors)
        .with(request_log)
        .map(|reply| Box::new(reply) as Box<dyn Reply>)
        .boxed()
}

/// Turns whatever warp couldn’t route into a JSON failure.
pub async fn format_rejection(
    environment: Environment,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, Infallible> {
    let error = if rej.is_not_found() || rej.find::<reject::MethodNotAllowed>().is_some() {
        BackendError::RouteNotFound
    } else {
        BackendError::Internal {
            detail: format!("{:?}", rej),
        }
    };

    Ok(reply_for(&environment, Rejection::new(Context::route(), error)))
}

/// Logs `rejection` and renders it with the matching status.
pub(crate) fn reply_for(environment: &Environment, rejection: Rejection) -> WithStatus<Json> {
    let status = status_code_for(&rejection.error);
    let logger = &environment.logger;

    if status.is_server_error() {
        error!(logger, "Backend error"; "context" => ?rejection.context, "error" => ?rejection.error, "status" => %status, "message" => %rejection.error);
    } else {
        debug!(logger, "Request failed"; "context" => ?rejection.context, "status" => %status, "message" => %rejection.error);
    }

    let flattened = rejection.flatten(environment.config.development());

    with_status(json(&flattened), status)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        MissingQuery => StatusCode::BAD_REQUEST,
        NotFound { .. } | RouteNotFound => StatusCode::NOT_FOUND,
        Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert("x-dns-prefetch-control", HeaderValue::from_static("off"));

    headers
}

mod internal {
    use std::convert::Infallible;

    use serde::de::DeserializeOwned;
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{get as g, path as p, path::param as par, query};

    use super::handlers;
    use crate::environment::Environment;
    use crate::query::{from_query_string, ListingQuery, SearchQuery};

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    /// Extracts the query parameters without ever rejecting, so a route
    /// that matched its path always answers instead of falling through
    /// to `/api/properties/{id}`.
    fn params<T>() -> impl Filter<Extract = (T,), Error = Infallible> + Clone
    where
        T: DeserializeOwned + Default + Send,
    {
        query::raw()
            .or(warp::any().map(String::new))
            .unify()
            .map(|raw: String| from_query_string::<T>(&raw))
    }

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
                .map(move || environment.clone())
                .and(p("api"));

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_listings_route => listings, rt; p("properties"), end(), g(), params::<ListingQuery>());
    route!(make_search_route => search, rt; p("properties"), p("search"), end(), g(), params::<SearchQuery>());
    route!(make_category_route => by_category, rt; p("properties"), p("category"), par::<String>(), end(), g());
    route!(make_location_route => by_location, rt; p("properties"), p("location"), par::<String>(), end(), g());
    route!(make_retrieve_route => retrieve, rt; p("properties"), par::<String>(), end(), g());
    route!(make_categories_route => categories, rt; p("categories"), end(), g());
}
