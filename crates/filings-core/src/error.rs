//! Error types for filings-core

use thiserror::Error;

/// Result type alias for filings-core
pub type Result<T> = std::result::Result<T, FilingsError>;

/// Error type for fetch and ingestion operations
#[derive(Error, Debug)]
pub enum FilingsError {
    /// Missing or malformed filters, rejected before any fetch
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Upstream unreachable or returned something unusable
    #[error("Fetch failed: {0}")]
    FetchFailure(String),

    /// Upstream answered but carried no record list
    #[error("No records found in response")]
    NoRecords,

    /// Persistence was attempted but the store could not be reached
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A fetched record cannot become an announcement
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FilingsError {
    /// Whether the error originates from the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParameters(_) | Self::NoRecords)
    }
}
