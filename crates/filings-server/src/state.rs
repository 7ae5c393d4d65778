//! Shared handler state

use filings_core::{Fetcher, Ingestor, Result};
use filings_nse::NseClient;
use filings_store::open_store;
use filings_utils::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::ScrapeCache;

/// State shared by every handler
///
/// Persistence is enabled exactly when `ingestor` is set.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetcher>,
    pub ingestor: Option<Ingestor>,
    pub cache: ScrapeCache,
}

impl AppState {
    /// Create state from its parts
    pub fn new(fetcher: Arc<dyn Fetcher>, ingestor: Option<Ingestor>, cache_ttl: Duration) -> Self {
        Self {
            fetcher,
            ingestor,
            cache: ScrapeCache::new(cache_ttl),
        }
    }

    /// Build the production state
    ///
    /// A store that cannot be opened is logged and the service runs in
    /// fetch-only mode.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = Arc::new(NseClient::new(&config.nse)?);

        let ingestor = match &config.store {
            Some(store_config) => match open_store(store_config).await {
                Ok(store) => Some(Ingestor::new(store)),
                Err(e) => {
                    warn!("Persistence disabled, store unavailable: {}", e);
                    None
                }
            },
            None => {
                info!("No store configured, running fetch-only");
                None
            }
        };

        Ok(Self::new(fetcher, ingestor, config.cache_ttl))
    }

    /// Whether fetched records are persisted
    pub fn persistence_enabled(&self) -> bool {
        self.ingestor.is_some()
    }
}
