//! Short-lived cache of fetch results

use cached::{Cached, TimedCache};
use filings_core::{FetchQuery, Record, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Fetch results keyed by query
///
/// A zero TTL disables caching.
#[derive(Clone)]
pub struct ScrapeCache {
    cache: Arc<RwLock<TimedCache<FetchQuery, Vec<Record>>>>,
    enabled: bool,
}

impl ScrapeCache {
    /// Create a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
            enabled: !ttl.is_zero(),
        }
    }

    /// Get the cached records for a query
    pub async fn get(&self, query: &FetchQuery) -> Option<Vec<Record>> {
        if !self.enabled {
            return None;
        }
        let mut cache = self.cache.write().await;
        cache.cache_get(query).cloned()
    }

    /// Cache records for a query
    pub async fn insert(&self, query: FetchQuery, records: Vec<Record>) {
        if !self.enabled {
            return;
        }
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(query, records);
    }

    /// Serve `query` from cache, or run `fetch` and remember its result
    ///
    /// With `force` the cached entry is ignored and replaced. Errors are
    /// never cached. The flag in the result tells whether the records came
    /// from cache.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        query: &FetchQuery,
        force: bool,
        fetch: F,
    ) -> Result<(Vec<Record>, bool)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Record>>>,
    {
        if !force {
            if let Some(records) = self.get(query).await {
                tracing::debug!(?query, "Cache hit");
                return Ok((records, true));
            }
        }

        tracing::debug!(?query, force, "Cache miss");
        let records = fetch().await?;
        self.insert(query.clone(), records.clone()).await;

        Ok((records, false))
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
