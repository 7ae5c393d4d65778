//! Route handlers
//!
//! - [`index`]: banner and health
//! - [`scrape`]: fetch and persist announcements
//! - [`companies`]: read persisted company documents

pub mod companies;
pub mod index;
pub mod scrape;
