//! Document store trait definition

use crate::{CompanyDocument, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistent store of per-company documents
///
/// Documents are addressed by company name. Implementations must write a
/// whole document atomically and report connectivity problems as
/// [`FilingsError::StorageUnavailable`](crate::FilingsError::StorageUnavailable).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up a document by company name
    async fn find_document(&self, company: &str) -> Result<Option<CompanyDocument>>;

    /// Insert or replace the document keyed by `document.company`
    async fn upsert_document(&self, document: &CompanyDocument) -> Result<()>;

    /// All stored company names, sorted
    async fn list_companies(&self) -> Result<Vec<String>>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;
}

/// In-process store backed by a map
///
/// Used for `memory://` connection strings and in tests. Contents are lost
/// when the process exits.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, CompanyDocument>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Check if no document is stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_document(&self, company: &str) -> Result<Option<CompanyDocument>> {
        Ok(self.documents.read().await.get(company).cloned())
    }

    async fn upsert_document(&self, document: &CompanyDocument) -> Result<()> {
        self.documents
            .write()
            .await
            .insert(document.company.clone(), document.clone());
        Ok(())
    }

    async fn list_companies(&self) -> Result<Vec<String>> {
        let mut companies: Vec<String> = self.documents.read().await.keys().cloned().collect();
        companies.sort();
        Ok(companies)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
