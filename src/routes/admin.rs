use warp::reject;
use warp::reply::{json, Reply};
use warp::Filter;

use super::response::{Endpoints, ServiceResponse};
use crate::environment::Environment;

pub fn make_index_route(
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    warp::path::end().and(warp::get()).map(|| {
        json(&ServiceResponse::Index {
            message: "Property listings API",
            version: info::VERSION,
            endpoints: Endpoints {
                properties: "/api/properties",
                property_by_id: "/api/properties/:id",
                search: "/api/properties/search?q=search_term",
                categories: "/api/categories",
                health: "/api/health",
            },
        })
    })
}

pub fn make_health_route(
    environment: Environment,
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    warp::path!("api" / "health")
        .and(warp::get())
        .map(move || {
            let timestamp = time::OffsetDateTime::now_utc().format(time::Format::Rfc3339);

            json(&ServiceResponse::Health {
                status: "OK",
                timestamp,
                uptime: environment.uptime().as_secs_f64(),
                version: info::VERSION,
                revision: info::REVISION,
            })
        })
}
