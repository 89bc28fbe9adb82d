use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::Logger;

use crate::config::{get_flag, get_variable_or, split_list};
use crate::store::{load_or_empty, Snapshot, Store};

pub const DEFAULT_PORT: &str = "3001";
pub const DEFAULT_DATA_PATH: &str = "data/properties.json";
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://localhost:3000";

/// The shared handles every route needs.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
    started: Instant,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            logger,
            store,
            config: Arc::new(config),
            started: Instant::now(),
        }
    }

    /// Loads the current collection, or an empty one if the source is
    /// unavailable.
    pub async fn listings(&self) -> Snapshot {
        load_or_empty(&self.logger, self.store.as_ref()).await
    }

    /// How long this environment has existed.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub(crate) port: u16,
    pub(crate) data_path: PathBuf,
    /// Whether to load the collection once and keep it.
    pub(crate) cache: bool,
    /// Whether internal error details may be sent to clients.
    pub(crate) development: bool,
    pub(crate) allowed_origins: Vec<String>,
}

impl Config {
    pub fn new(
        port: u16,
        data_path: impl Into<PathBuf>,
        cache: bool,
        development: bool,
        allowed_origins: Vec<String>,
    ) -> Self {
        Self {
            port,
            data_path: data_path.into(),
            cache,
            development,
            allowed_origins,
        }
    }

    /// Reads the configuration from `LISTINGS_*` environment variables,
    /// using defaults for anything unset. Panics if the port isn’t a
    /// valid number.
    pub fn from_env() -> Self {
        let port = get_variable_or("LISTINGS_PORT", DEFAULT_PORT)
            .parse()
            .expect("parse LISTINGS_PORT as u16");

        Config::new(
            port,
            get_variable_or("LISTINGS_DATA_PATH", DEFAULT_DATA_PATH),
            get_flag("LISTINGS_CACHE"),
            get_variable_or("LISTINGS_ENVIRONMENT", "production") == "development",
            split_list(&get_variable_or(
                "LISTINGS_ALLOWED_ORIGINS",
                DEFAULT_ALLOWED_ORIGINS,
            )),
        )
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn data_path(&self) -> &PathBuf {
        &self.data_path
    }

    pub fn cache(&self) -> bool {
        self.cache
    }

    pub fn development(&self) -> bool {
        self.development
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(
            3001,
            DEFAULT_DATA_PATH,
            false,
            false,
            split_list(DEFAULT_ALLOWED_ORIGINS),
        )
    }
}
