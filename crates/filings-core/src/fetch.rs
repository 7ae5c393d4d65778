//! Fetcher trait definition

use crate::{FetchQuery, Record, Result};
use async_trait::async_trait;

/// Source of announcement records
///
/// Implementations surface every upstream problem as
/// [`FilingsError::FetchFailure`](crate::FilingsError::FetchFailure) or
/// [`FilingsError::NoRecords`](crate::FilingsError::NoRecords).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the records matching `query`
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<Record>>;
}
