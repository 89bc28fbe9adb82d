use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::{debug, error, warn, Logger};
use tokio::sync::OnceCell;

use crate::errors::LoadError;
use crate::listing::{Listing, Source};
use crate::validation::validate;

pub mod mock;

/// An immutable, shareable view of the whole collection.
pub type Snapshot = Arc<Vec<Listing>>;

pub trait Store: Send + Sync {
    /// Loads the whole collection. Either every listing is returned or
    /// none are.
    fn load(&self) -> BoxFuture<'_, Result<Snapshot, LoadError>>;
}

/// Loads the collection from `store`, falling back to an empty one if
/// the source is missing or broken. Violations of the collection
/// invariants are logged but don’t prevent the listings from being
/// served.
pub async fn load_or_empty(logger: &Logger, store: &dyn Store) -> Snapshot {
    match store.load().await {
        Ok(listings) => {
            debug!(logger, "Loaded listings"; "count" => listings.len());

            for violation in validate(&listings) {
                warn!(logger, "Listing violates collection invariants"; "id" => &violation.id, "problem" => %violation);
            }

            listings
        }
        Err(e) => {
            error!(logger, "Failed to load listings, serving none"; "error" => ?e, "message" => %e);
            Arc::new(vec![])
        }
    }
}

/// A store that reads a JSON file on every load.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a new instance.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> BoxFuture<'_, Result<Snapshot, LoadError>> {
        read(&self.path).boxed()
    }
}

async fn read(path: &Path) -> Result<Snapshot, LoadError> {
    let raw = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;

    let source: Source = serde_json::from_slice(&raw).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })?;

    Ok(Arc::new(source.properties))
}

/// A store that loads from another store once and serves that snapshot
/// from then on. Failed loads aren’t remembered, so the next call tries
/// again.
pub struct CachedStore<S> {
    inner: S,
    snapshot: OnceCell<Snapshot>,
}

impl<S: Store> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            snapshot: OnceCell::new(),
        }
    }
}

impl<S: Store> Store for CachedStore<S> {
    fn load(&self) -> BoxFuture<'_, Result<Snapshot, LoadError>> {
        async move {
            let snapshot = self
                .snapshot
                .get_or_try_init(|| self.inner.load())
                .await?;

            Ok(snapshot.clone())
        }
        .boxed()
    }
}
