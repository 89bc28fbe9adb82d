use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::errors::LoadError;
use crate::listing::Listing;
use crate::store::{Snapshot, Store};

/// A store serving a fixed collection from memory, or failing every
/// load. Counts how often it is asked.
pub struct MockStore {
    listings: Option<Snapshot>,
    loads: Arc<AtomicUsize>,
}

impl MockStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        MockStore {
            listings: Some(Arc::new(listings)),
            loads: Arc::default(),
        }
    }

    /// Creates a store whose source is always unreadable.
    pub fn failing() -> Self {
        MockStore {
            listings: None,
            loads: Arc::default(),
        }
    }

    /// The number of loads attempted so far.
    pub fn loads(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }
}

impl Store for MockStore {
    fn load(&self) -> BoxFuture<'_, Result<Snapshot, LoadError>> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        let result = self.listings.clone().ok_or_else(|| LoadError::Read {
            path: PathBuf::from("mock"),
            source: io::Error::new(io::ErrorKind::NotFound, "mock store is failing"),
        });

        async move {
            // suspend once so that concurrent loads overlap
            tokio::task::yield_now().await;
            result
        }
        .boxed()
    }
}
