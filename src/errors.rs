use std::path::PathBuf;

use thiserror::Error;

/// Enumerates errors returned by the request-level operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents a search request without a search term.
    #[error("Search query is required")]
    MissingQuery,

    /// Represents a lookup for an ID that isn’t in the collection.
    #[error("Property not found")]
    NotFound { id: String },

    /// Represents a request for a path the service doesn’t serve.
    #[error("Route not found")]
    RouteNotFound,

    /// Represents any failure the caller can’t do anything about.
    #[error("Something went wrong!")]
    Internal { detail: String },
}

/// Enumerates errors returned by the store subsystem.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Represents a source that couldn’t be read.
    #[error("Failed to read listings from {path:?}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a source that was read but isn’t a valid collection.
    #[error("Failed to parse listings from {path:?}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
