use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::debug;
use warp::{
    reject,
    reply::{json, with_header, Json, Reply},
};

use crate::engine;
use crate::environment::Environment;
use crate::errors::BackendError;
use crate::query::{ListingQuery, SearchQuery};
use crate::routes::{
    rejection::{Context, Rejection},
    reply_for,
    response::{Success, SuccessResponse},
};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

/// Runs `$body`, which must evaluate to a `Result<Json, BackendError>`,
/// and replies with either the JSON or the failure for `$context`. The
/// reply is never a rejection, so a failing route doesn’t fall through
/// to the next one.
macro_rules! timed {
    ($environment:expr, $context:expr, $body:block) => {{
        let start = Instant::now();

        let result = (|| -> Result<Json, BackendError> { $body })();

        let reply = match result {
            Ok(reply) => Box::new(reply) as Box<dyn Reply>,
            Err(e) => Box::new(reply_for(&$environment, Rejection::new($context, e))) as Box<dyn Reply>,
        };

        Ok(Box::new(with_header(
            reply,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    }};
}

pub async fn listings(environment: Environment, query: ListingQuery) -> RouteResult {
    let all = environment.listings().await;

    timed!(environment, Context::listings(), {
        let result = engine::query(&all, &query);
        debug!(environment.logger, "Queried listings"; "filters" => ?result.filters, "total" => result.pagination.total_items);

        Ok(respond(SuccessResponse::Listings {
            data: result.page,
            pagination: result.pagination,
            filters: result.filters,
        }))
    })
}

pub async fn search(environment: Environment, query: SearchQuery) -> RouteResult {
    let all = environment.listings().await;
    let SearchQuery { q } = query;

    timed!(environment, Context::search(q.clone()), {
        let data = engine::search_only(&all, q.as_deref())?;
        debug!(environment.logger, "Searched listings"; "query" => ?q, "count" => data.len());

        Ok(respond(SuccessResponse::Search {
            count: data.len(),
            data,
            query: q.clone().unwrap_or_default(),
        }))
    })
}

pub async fn by_category(environment: Environment, category: String) -> RouteResult {
    let all = environment.listings().await;
    let category = decode(&category);

    timed!(environment, Context::category(category.clone()), {
        let data = engine::by_category(&all, &category);
        debug!(environment.logger, "Listed category"; "category" => &category, "count" => data.len());

        Ok(respond(SuccessResponse::Category {
            count: data.len(),
            data,
            category: category.clone(),
        }))
    })
}

pub async fn by_location(environment: Environment, location: String) -> RouteResult {
    let all = environment.listings().await;
    let location = decode(&location);

    timed!(environment, Context::location(location.clone()), {
        let data = engine::by_location(&all, &location);
        debug!(environment.logger, "Listed location"; "location" => &location, "count" => data.len());

        Ok(respond(SuccessResponse::Location {
            count: data.len(),
            data,
            location: location.clone(),
        }))
    })
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    let all = environment.listings().await;
    let id = decode(&id);

    timed!(environment, Context::retrieve(id.clone()), {
        debug!(environment.logger, "Retrieving listing..."; "id" => &id);
        let data = engine::by_id(&all, &id)?;

        Ok(respond(SuccessResponse::Listing { data }))
    })
}

pub async fn categories(environment: Environment) -> RouteResult {
    let all = environment.listings().await;

    timed!(environment, Context::categories(), {
        let data = engine::distinct_categories(&all);

        Ok(respond(SuccessResponse::Categories { data }))
    })
}

fn respond(response: SuccessResponse) -> Json {
    json(&Success::from(response))
}

/// Percent-decodes a path segment, keeping it as-is if the result
/// wouldn’t be valid UTF-8.
fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .unwrap_or(Cow::Borrowed(segment))
        .into_owned()
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
