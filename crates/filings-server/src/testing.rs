//! Handler test fixtures

use async_trait::async_trait;
use filings_core::{
    CompanyDocument, DocumentStore, FetchQuery, Fetcher, FilingsError, Ingestor, MemoryStore,
    Record, Result,
};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::state::AppState;

/// Fetcher returning a canned outcome and counting calls
pub struct StubFetcher {
    outcome: std::result::Result<Vec<Record>, fn() -> FilingsError>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn returning(records: Vec<Record>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(records),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: fn() -> FilingsError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, _query: &FetchQuery) -> Result<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(records) => Ok(records.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

/// Store whose every call fails as if the database were down
pub struct DownStore;

#[async_trait]
impl DocumentStore for DownStore {
    async fn find_document(&self, _company: &str) -> Result<Option<CompanyDocument>> {
        Err(FilingsError::StorageUnavailable("connection refused".into()))
    }

    async fn upsert_document(&self, _document: &CompanyDocument) -> Result<()> {
        Err(FilingsError::StorageUnavailable("connection refused".into()))
    }

    async fn list_companies(&self) -> Result<Vec<String>> {
        Err(FilingsError::StorageUnavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<()> {
        Err(FilingsError::StorageUnavailable("connection refused".into()))
    }
}

pub fn sample_records() -> Vec<Record> {
    [
        json!({"symbol": "INFY", "sm_name": "Infosys Limited", "an_dt": "21-Oct-2025 21:41:32", "desc": "Updates"}),
        json!({"symbol": "INFY", "sm_name": "Infosys Limited", "an_dt": "21-Oct-2025 16:00:00", "desc": "Press Release"}),
        json!({"symbol": "TCS", "sm_name": "Tata Consultancy Services Limited", "an_dt": "21-Oct-2025 19:05:12"}),
    ]
    .into_iter()
    .filter_map(Record::from_value)
    .collect()
}

pub fn state(fetcher: Arc<StubFetcher>, store: Option<MemoryStore>) -> AppState {
    let ingestor = store.map(|store| Ingestor::new(Arc::new(store)));
    AppState::new(fetcher, ingestor, Duration::from_secs(60))
}

pub fn state_with_store(fetcher: Arc<StubFetcher>, store: Arc<dyn DocumentStore>) -> AppState {
    AppState::new(fetcher, Some(Ingestor::new(store)), Duration::from_secs(60))
}
