//! Core abstractions for nse-filings
//!
//! This crate defines the domain types (records, announcements, company
//! documents), the seams to the outside world ([`Fetcher`] and
//! [`DocumentStore`]) and the deduplicating [`Ingestor`] that sits between
//! them.
//!
//! # Example
//!
//! ```rust,ignore
//! use filings_core::{Ingestor, MemoryStore, Record};
//! use std::sync::Arc;
//!
//! let ingestor = Ingestor::new(Arc::new(MemoryStore::new()));
//! let report = ingestor.ingest_records(&records).await;
//! println!("{} new announcements", report.inserted);
//! ```

pub mod error;
pub mod fetch;
pub mod ingest;
pub mod model;
pub mod query;
pub mod record;
pub mod store;

pub use error::{FilingsError, Result};
pub use fetch::Fetcher;
pub use ingest::{IngestError, IngestReport, Ingestor};
pub use model::{Announcement, CompanyDocument, MergeOutcome, Payload};
pub use query::FetchQuery;
pub use record::Record;
pub use store::{DocumentStore, MemoryStore};
