//! Concurrent fan-out over catalog adapters.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use common::collection_metadata::{FederatedSearchError, SearchItem};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::api::catalogs::CollectionSearch;

/// Process-wide worker pool for catalog calls: at most `size` adapters run at once.
///
/// Created once at startup and shared by every search and health check. `shutdown` stops
/// accepting work and waits for in-flight adapter calls to finish.
#[derive(Debug, Clone)]
pub struct CatalogPool {
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
}

impl CatalogPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self { permits: Arc::new(Semaphore::new(size)), tracker: TaskTracker::new() }
    }

    pub fn is_shut_down(&self) -> bool {
        self.tracker.is_closed()
    }

    /// `None` once the pool is shut down.
    fn spawn<F>(&self, task: F) -> Option<JoinHandle<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if self.tracker.is_closed() {
            return None;
        }
        let permits = self.permits.clone();
        Some(self.tracker.spawn(async move {
            // the semaphore is never closed, so acquiring only waits
            let _permit = permits.acquire_owned().await.ok();
            task.await
        }))
    }

    pub async fn shutdown(&self) {
        self.tracker.close();
        info!("Draining {} in-flight catalog tasks", self.tracker.len());
        self.tracker.wait().await;
        info!("Catalog pool shut down");
    }
}

impl Default for CatalogPool {
    fn default() -> Self {
        Self::new(crate::config::default_worker_pool_size())
    }
}

/// Merged adapter outputs, catalog by catalog.
pub type SearchItems = std::iter::Flatten<std::vec::IntoIter<Vec<SearchItem>>>;

/// Runs every catalog's search on the pool and concatenates the outputs in submission order.
///
/// Each catalog's output is complete before it is emitted; catalogs run concurrently with
/// each other. A catalog whose task dies contributes one error element at its position.
/// No limit is applied here: callers stop consuming the iterator.
pub async fn search_all<S: CollectionSearch>(pool: &CatalogPool, catalogs: Vec<S>) -> SearchItems {
    let tasks = catalogs.into_iter().map(|catalog| {
        let base_url = catalog.base_url().to_string();
        let handle = pool.spawn(async move { catalog.get_collection_metadata().await });
        async move {
            match handle {
                None => vec![SearchItem::Error(FederatedSearchError::new(base_url, "catalog worker pool is shut down"))],
                Some(handle) => match handle.await {
                    Ok(items) => items,
                    Err(e) => {
                        error!("{}: collection search task failed: {}", base_url, e);
                        vec![SearchItem::Error(FederatedSearchError::new(base_url, format!("collection search task failed: {e}")))]
                    }
                },
            }
        }
    });
    // join_all keeps submission order
    join_all(tasks.collect::<Vec<_>>()).await.into_iter().flatten()
}

/// Probes every catalog on the pool. Keyed by base URL; a URL configured twice is probed
/// once, for its first occurrence.
pub async fn check_health<S: CollectionSearch>(pool: &CatalogPool, catalogs: Vec<S>) -> BTreeMap<String, String> {
    let mut seen = HashSet::new();
    let mut handles = Vec::new();
    for catalog in catalogs {
        let base_url = catalog.base_url().to_string();
        if !seen.insert(base_url.clone()) {
            warn!("{} is configured more than once; probing it once", base_url);
            continue;
        }
        handles.push((base_url, pool.spawn(async move { catalog.check_health().await })));
    }

    let probes = handles.into_iter().map(|(base_url, handle)| async move {
        let status = match handle {
            None => "catalog worker pool is shut down".to_string(),
            Some(handle) => match handle.await {
                Ok(status) => status,
                Err(e) => {
                    error!("{}: health check task failed: {}", base_url, e);
                    format!("health check failed: {e}")
                }
            },
        };
        (base_url, status)
    });
    join_all(probes).await.into_iter().collect()
}
