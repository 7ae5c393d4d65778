//! Document store backends for nse-filings
//!
//! A store is chosen from its connection string:
//!
//! | url                 | backend                         |
//! |---------------------|---------------------------------|
//! | `memory://`         | [`MemoryStore`]                 |
//! | `sqlite::memory:`   | [`SqliteStore`], in memory      |
//! | `sqlite://<path>`   | [`SqliteStore`], file at `path` |

pub mod location;
pub mod sqlite;

pub use filings_core::MemoryStore;
pub use location::StoreLocation;
pub use sqlite::SqliteStore;

use filings_core::{DocumentStore, Result};
use filings_utils::StoreConfig;
use std::sync::Arc;
use tracing::info;

/// Open the store described by `config` and check it is reachable
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    let location = StoreLocation::parse(&config.url)?;

    let store: Arc<dyn DocumentStore> = match &location {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::SqliteMemory => Arc::new(SqliteStore::open_in_memory(&config.collection)?),
        StoreLocation::SqliteFile(path) => Arc::new(SqliteStore::open(path, &config.collection)?),
    };

    store.ping().await?;
    info!(store = %location, collection = %config.collection, "Connected to document store");

    Ok(store)
}
