use std::error::Error;
use std::sync::Arc;

use listings::environment::{Config, Environment};
use listings::routes;
use listings::store::{CachedStore, JsonFileStore, Store};
use log::{info, initialize_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger();

    #[cfg(feature = "env_logging")]
    let _guard = log::initialize_env_logger();

    let config = Config::from_env();
    let port = config.port();

    info!(logger, "Starting..."; "port" => port, "data_path" => %config.data_path().display(), "cache" => config.cache());
    let logger = Arc::new(logger);

    let source = JsonFileStore::new(config.data_path().clone());
    let store: Arc<dyn Store> = if config.cache() {
        Arc::new(CachedStore::new(source))
    } else {
        Arc::new(source)
    };

    let environment = Environment::new(logger.clone(), store, config);

    let initial = environment.listings().await;
    info!(logger, "Listings available"; "count" => initial.len());

    let routes = routes::make_api(environment);

    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async {
        tokio::signal::ctrl_c().await.ok();
    });

    server.await;

    info!(logger, "Exiting gracefully...");

    Ok(())
}
