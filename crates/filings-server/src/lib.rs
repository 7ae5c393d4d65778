//! HTTP wrapper around the announcements fetcher
//!
//! # Endpoints
//!
//! - `GET /` - service banner
//! - `GET /health` - liveness, reports whether persistence is enabled
//! - `GET /scrape` - fetch announcements, persisting them when a store is configured
//! - `GET /companies/{company}` - the persisted document for one company
//!
//! Every error body has the shape `{"success": false, "error": "..."}`.

pub mod app;
pub mod cache;
pub mod error;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use app::{create_app, serve};
pub use cache::ScrapeCache;
pub use error::{AppError, AppResult};
pub use state::AppState;
