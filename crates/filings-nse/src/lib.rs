//! NSE corporate announcements client
//!
//! [`NseClient`] talks to the public JSON endpoints behind
//! `nseindia.com`. The site only answers API calls from a session that has
//! first loaded a regular page, so every fetch starts with a cookie
//! bootstrap request.
//!
//! # Example
//!
//! ```rust,ignore
//! use filings_core::{FetchQuery, Fetcher};
//! use filings_nse::NseClient;
//! use filings_utils::NseConfig;
//!
//! let client = NseClient::new(&NseConfig::default())?;
//! let records = client.fetch(&FetchQuery::default()).await?;
//! ```

pub mod client;
pub mod envelope;
pub mod listings;

pub use client::{NseClient, paths};
pub use envelope::extract_records;
pub use listings::{ListingSnapshot, new_listings};
