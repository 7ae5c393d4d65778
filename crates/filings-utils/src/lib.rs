//! Shared utilities for nse-filings
//!
//! This crate provides common functionality used across the workspace:
//! logging setup and the application configuration that is built once at
//! startup and passed down to every component.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AppConfig, AppConfigBuilder, NseConfig, ServerConfig, StoreConfig};
pub use error::{ConfigError, Result};
pub use logging::{init_tracing, init_tracing_with};
