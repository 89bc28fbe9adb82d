use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use warp::http::{Response, StatusCode};

use listings::environment::{Config, Environment};
use listings::listing::Listing;
use listings::pagination::Pagination;
use listings::query::FilterEcho;
use listings::routes::{make_api, Api};
use listings::store::mock::MockStore;
use listings::store::{CachedStore, JsonFileStore, Store};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
struct ListingsReply {
    success: bool,
    data: Vec<Listing>,
    pagination: Pagination,
    filters: FilterEcho,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchReply {
    success: bool,
    data: Vec<Listing>,
    query: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryReply {
    success: bool,
    data: Vec<Listing>,
    category: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationReply {
    success: bool,
    data: Vec<Listing>,
    location: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListingReply {
    success: bool,
    data: Listing,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoriesReply {
    success: bool,
    data: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FailureReply {
    success: bool,
    message: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HealthReply {
    status: String,
    timestamp: String,
    uptime: f64,
    version: String,
    revision: Option<String>,
}

static SLOG_SCOPE_GUARD: OnceCell<slog_scope::GlobalLoggerGuard> = OnceCell::new();

const FIXTURE_PATH: &str = "tests/fixtures/properties.json";
const FIXTURE_COUNT: usize = 12;

fn initialize_global_logger() {
    SLOG_SCOPE_GUARD.get_or_init(|| slog_envlogger::init().expect("initialize slog-envlogger"));
}

fn make_api_with(store: Arc<dyn Store>) -> Api {
    initialize_global_logger();

    let logger = Arc::new(slog_scope::logger());
    make_api(Environment::new(logger, store, Config::default()))
}

fn make_fixture_api() -> Api {
    make_api_with(Arc::new(JsonFileStore::new(FIXTURE_PATH)))
}

async fn get(api: &Api, path: &str) -> Response<Bytes> {
    warp::test::request()
        .path(path)
        .method("GET")
        .reply(api)
        .await
}

fn parse<T: DeserializeOwned>(response: &Response<Bytes>) -> T {
    serde_json::from_slice(response.body()).unwrap_or_else(|e| {
        panic!(
            "parse {:?} as JSON: {}",
            String::from_utf8_lossy(response.body()),
            e
        )
    })
}

fn ids(listings: &[Listing]) -> Vec<&str> {
    listings.iter().map(Listing::id).collect()
}

#[tokio::test]
async fn listing_defaults_to_first_ten() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("server-timing"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");

    let reply: ListingsReply = parse(&response);

    assert!(reply.success);
    assert_eq!(reply.data.len(), 10);
    assert_eq!(
        reply.pagination,
        Pagination {
            current_page: 1,
            total_pages: 2,
            total_items: FIXTURE_COUNT,
            items_per_page: 10,
            has_next_page: true,
            has_prev_page: false,
        }
    );
    assert_eq!(reply.filters, FilterEcho::default());
}

#[tokio::test]
async fn combined_filters_are_applied_and_echoed() {
    let api = make_fixture_api();
    let response = get(
        &api,
        "/api/properties?search=Bangalore&category=amazing_views&minPrice=2000&maxPrice=3000",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let reply: ListingsReply = parse(&response);

    assert_eq!(ids(&reply.data), vec!["1"]);
    assert_eq!(reply.pagination.total_items, 1);
    assert_eq!(reply.pagination.total_pages, 1);
    assert_eq!(
        reply.filters,
        FilterEcho {
            category: Some("amazing_views".to_owned()),
            location: None,
            min_price: Some("2000".to_owned()),
            max_price: Some("3000".to_owned()),
            min_rating: None,
            search: Some("Bangalore".to_owned()),
        }
    );
}

#[tokio::test]
async fn pages_are_sliced_from_the_filtered_set() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties?page=2&limit=5").await;
    let reply: ListingsReply = parse(&response);

    assert_eq!(ids(&reply.data), vec!["6", "7", "8", "9", "10"]);
    assert_eq!(reply.pagination.current_page, 2);
    assert_eq!(reply.pagination.items_per_page, 5);
    assert_eq!(reply.pagination.total_pages, 3);
    assert!(reply.pagination.has_next_page);
    assert!(reply.pagination.has_prev_page);

    let response = get(&api, "/api/properties?minRating=4.8&page=2&limit=2").await;
    let reply: ListingsReply = parse(&response);

    assert_eq!(ids(&reply.data), vec!["5", "9"]);
    assert_eq!(reply.pagination.total_items, 5);
    assert_eq!(reply.pagination.total_pages, 3);
    assert_eq!(reply.filters.min_rating.as_deref(), Some("4.8"));

    let response = get(&api, "/api/properties?page=9").await;
    let reply: ListingsReply = parse(&response);

    assert!(reply.data.is_empty());
    assert!(!reply.pagination.has_next_page);
    assert!(reply.pagination.has_prev_page);
}

#[tokio::test]
async fn malformed_numbers_are_ignored() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties?minPrice=notanumber&maxPrice=also-invalid&page=zero&limit=-3").await;

    assert_eq!(response.status(), StatusCode::OK);

    let reply: ListingsReply = parse(&response);

    assert!(reply.success);
    assert_eq!(reply.pagination.total_items, FIXTURE_COUNT);
    assert_eq!(reply.pagination.current_page, 1);
    assert_eq!(reply.pagination.items_per_page, 10);
    assert_eq!(reply.filters.min_price, None);
    assert_eq!(reply.filters.max_price, None);
}

#[tokio::test]
async fn location_filter_ignores_case() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties?location=KERALA").await;
    let reply: ListingsReply = parse(&response);

    assert_eq!(ids(&reply.data), vec!["4", "7"]);
    assert_eq!(reply.filters.location.as_deref(), Some("KERALA"));
}

#[tokio::test]
async fn search_matches_every_text_field() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties/search?q=beach").await;

    assert_eq!(response.status(), StatusCode::OK);

    let reply: SearchReply = parse(&response);

    assert!(reply.success);
    assert_eq!(ids(&reply.data), vec!["3", "4", "11"]);
    assert_eq!(reply.query, "beach");
    assert_eq!(reply.count, 3);
}

#[tokio::test]
async fn search_requires_a_query() {
    let api = make_fixture_api();

    for path in &["/api/properties/search", "/api/properties/search?q="] {
        let response = get(&api, path).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);

        let reply: FailureReply = parse(&response);

        assert!(!reply.success);
        assert_eq!(reply.message, "Search query is required");
    }
}

#[tokio::test]
async fn search_without_matches_is_empty() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties/search?q=nonexistentproperty12345").await;

    assert_eq!(response.status(), StatusCode::OK);

    let reply: SearchReply = parse(&response);

    assert!(reply.data.is_empty());
    assert_eq!(reply.count, 0);
}

#[tokio::test]
async fn category_listing_is_exact() {
    let api = make_fixture_api();

    let reply: CategoryReply = parse(&get(&api, "/api/properties/category/beachfront").await);

    assert!(reply.success);
    assert_eq!(ids(&reply.data), vec!["3", "4", "11"]);
    assert_eq!(reply.category, "beachfront");
    assert_eq!(reply.count, 3);

    let reply: CategoryReply = parse(&get(&api, "/api/properties/category/non_existent").await);

    assert!(reply.data.is_empty());
    assert_eq!(reply.count, 0);
}

#[tokio::test]
async fn location_listing_decodes_the_path() {
    let api = make_fixture_api();

    let reply: LocationReply = parse(&get(&api, "/api/properties/location/Bangalore").await);

    assert!(reply.success);
    assert_eq!(ids(&reply.data), vec!["1", "6", "12"]);
    assert_eq!(reply.location, "Bangalore");
    assert_eq!(reply.count, 3);

    let reply: LocationReply = parse(&get(&api, "/api/properties/location/tamil%20nadu").await);

    assert_eq!(ids(&reply.data), vec!["10"]);
    assert_eq!(reply.location, "tamil nadu");
}

#[tokio::test]
async fn every_listing_can_be_retrieved() {
    let api = make_fixture_api();

    for id in 1..=FIXTURE_COUNT {
        let id = id.to_string();
        let response = get(&api, &format!("/api/properties/{}", id)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let reply: ListingReply = parse(&response);

        assert!(reply.success);
        assert_eq!(reply.data.id(), id);
    }
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    use uuid::Uuid;

    let api = make_fixture_api();

    for id in &["invalid-id".to_owned(), Uuid::new_v4().to_string()] {
        let response = get(&api, &format!("/api/properties/{}", id)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let reply: FailureReply = parse(&response);

        assert!(!reply.success);
        assert_eq!(reply.message, "Property not found");
    }
}

#[tokio::test]
async fn categories_reflect_the_data() {
    let api = make_fixture_api();
    let reply: CategoriesReply = parse(&get(&api, "/api/categories").await);

    assert!(reply.success);
    assert_eq!(
        reply.data,
        vec![
            "amazing_views",
            "mansions",
            "beachfront",
            "treehouses",
            "tiny_homes",
            "countryside",
            "chefs_kitchens",
        ]
    );
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let api = make_fixture_api();

    let response = get(&api, "/api/non-existent").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let reply: FailureReply = parse(&response);
    assert!(!reply.success);
    assert_eq!(reply.message, "Route not found");
    assert_eq!(reply.error, None);

    let response = warp::test::request()
        .path("/api/properties")
        .method("POST")
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_index_describe_the_service() {
    let api = make_fixture_api();

    let response = get(&api, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let reply: HealthReply = parse(&response);
    assert_eq!(reply.status, "OK");
    assert!(reply.uptime >= 0.0);
    assert!(!reply.timestamp.is_empty());
    assert_eq!(reply.version, info::VERSION);

    let response = get(&api, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let reply: serde_json::Value = parse(&response);
    assert_eq!(reply["endpoints"]["properties"], "/api/properties");
}

#[tokio::test]
async fn allowed_origins_get_cors_headers() {
    let api = make_fixture_api();

    let response = warp::test::request()
        .path("/api/properties")
        .method("GET")
        .header("origin", "http://localhost:5173")
        .reply(&api)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn broken_sources_serve_nothing() {
    let mut file = tempfile::NamedTempFile::new().expect("create temporary file");
    write!(file, "this is not JSON").expect("write temporary file");

    let api = make_api_with(Arc::new(JsonFileStore::new(file.path())));

    let response = get(&api, "/api/properties").await;
    assert_eq!(response.status(), StatusCode::OK);

    let reply: ListingsReply = parse(&response);
    assert!(reply.success);
    assert!(reply.data.is_empty());
    assert_eq!(reply.pagination.total_items, 0);
    assert_eq!(reply.pagination.total_pages, 0);

    let reply: CategoriesReply = parse(&get(&api, "/api/categories").await);
    assert!(reply.data.is_empty());

    let api = make_api_with(Arc::new(JsonFileStore::new("tests/fixtures/missing.json")));
    let response = get(&api, "/api/properties/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cached_store_loads_once() {
    let listings = JsonFileStore::new(FIXTURE_PATH)
        .load()
        .await
        .expect("load fixture");
    let mock = MockStore::new(listings.to_vec());
    let loads = mock.loads();

    let api = make_api_with(Arc::new(CachedStore::new(mock)));

    let first: ListingsReply = parse(&get(&api, "/api/properties?limit=20").await);
    let second: ListingsReply = parse(&get(&api, "/api/properties?limit=20").await);

    assert_eq!(first.data, second.data);
    assert_eq!(first.data.len(), FIXTURE_COUNT);
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_requests_all_succeed() {
    let api = make_fixture_api();

    let responses = join_all((0..10).map(|_| get(&api, "/api/properties"))).await;

    for response in &responses {
        assert_eq!(response.status(), StatusCode::OK);

        let reply: ListingsReply = parse(response);
        assert!(reply.success);
        assert_eq!(reply.pagination.total_items, FIXTURE_COUNT);
    }
}

#[tokio::test]
async fn repeated_search_terms_stay_on_the_search_route() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties/search?q=beach&q=goa").await;

    assert_eq!(response.status(), StatusCode::OK);

    let reply: SearchReply = parse(&response);

    assert_eq!(reply.query, "beach");
    assert_eq!(ids(&reply.data), vec!["3", "4", "11"]);
}

#[tokio::test]
async fn repeated_listing_parameters_keep_the_first_value() {
    let api = make_fixture_api();

    for path in &[
        "/api/properties?page=1&page=2",
        "/api/properties?search=a&search=b&limit=3",
    ] {
        let response = get(&api, path).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }

    let reply: ListingsReply = parse(&get(&api, "/api/properties?page=2&page=1&limit=5&limit=2").await);

    assert_eq!(ids(&reply.data), vec!["6", "7", "8", "9", "10"]);
    assert_eq!(reply.pagination.current_page, 2);
}

#[tokio::test]
async fn whole_prices_are_served_as_integers() {
    let api = make_fixture_api();
    let response = get(&api, "/api/properties/1").await;
    let body = String::from_utf8_lossy(response.body());

    assert!(body.contains(r#""price":2500,"#), "{}", body);
}
