//! Application configuration
//!
//! Everything the service needs is collected into an [`AppConfig`] once at
//! startup, either from the process environment ([`AppConfig::from_env`]) or
//! from any key lookup ([`AppConfig::from_lookup`]), and then handed to the
//! components that need it. Nothing below this point reads the environment.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Environment variable names
pub mod vars {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const STORE_URL: &str = "FILINGS_STORE_URL";
    pub const STORE_COLLECTION: &str = "FILINGS_STORE_COLLECTION";
    pub const NSE_BASE_URL: &str = "NSE_BASE_URL";
    pub const NSE_TIMEOUT_SECS: &str = "NSE_TIMEOUT_SECS";
    pub const NSE_WARMUP_MS: &str = "NSE_WARMUP_MS";
    pub const NSE_REQUESTS_PER_SECOND: &str = "NSE_REQUESTS_PER_SECOND";
    pub const CACHE_TTL_SECS: &str = "FILINGS_CACHE_TTL_SECS";
}

pub const DEFAULT_NSE_BASE_URL: &str = "https://www.nseindia.com";
pub const DEFAULT_COLLECTION: &str = "company";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Get bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Document store settings
///
/// Present only when a connection string was supplied; its absence puts the
/// service in fetch-only mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection string (`memory://`, `sqlite::memory:`, `sqlite://<path>`)
    pub url: String,
    /// Collection holding one document per company
    pub collection: String,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Validate the store settings
    ///
    /// The collection name ends up as a table identifier, so it is limited to
    /// ASCII alphanumerics, `_` and `-`.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store url must not be empty".to_string(),
            ));
        }

        let valid_collection = !self.collection.is_empty()
            && self
                .collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_collection {
            return Err(ConfigError::Invalid(format!(
                "invalid collection name: {:?}",
                self.collection
            )));
        }

        Ok(())
    }
}

/// Upstream NSE client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NseConfig {
    /// Site root, e.g. `https://www.nseindia.com`
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Pause between the cookie bootstrap and the API call
    pub warmup_delay: Duration,
    /// Client-side pacing of outbound requests
    pub requests_per_second: u32,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NSE_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            warmup_delay: Duration::from_secs(3),
            requests_per_second: 2,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NseConfig {
    /// Validate the client settings
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            key: vars::NSE_BASE_URL.to_string(),
            value: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if self.requests_per_second == 0 {
            return Err(ConfigError::Invalid(
                "requests_per_second must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: Option<StoreConfig>,
    pub nse: NseConfig,
    /// How long a scrape result is served from cache
    pub cache_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: None,
            nse: NseConfig::default(),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl AppConfig {
    /// Create a new configuration builder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(host) = get(vars::HOST) {
            builder = builder.host(host);
        }
        if let Some(port) = parse_var::<u16>(vars::PORT, get(vars::PORT))? {
            builder = builder.port(port);
        }
        if let Some(url) = get(vars::STORE_URL) {
            let mut store = StoreConfig::new(url);
            if let Some(collection) = get(vars::STORE_COLLECTION) {
                store = store.with_collection(collection);
            }
            builder = builder.store(store);
        }
        if let Some(base_url) = get(vars::NSE_BASE_URL) {
            builder = builder.nse_base_url(base_url);
        }
        if let Some(secs) = parse_var::<u64>(vars::NSE_TIMEOUT_SECS, get(vars::NSE_TIMEOUT_SECS))? {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        if let Some(ms) = parse_var::<u64>(vars::NSE_WARMUP_MS, get(vars::NSE_WARMUP_MS))? {
            builder = builder.warmup_delay(Duration::from_millis(ms));
        }
        if let Some(rps) = parse_var::<u32>(
            vars::NSE_REQUESTS_PER_SECOND,
            get(vars::NSE_REQUESTS_PER_SECOND),
        )? {
            builder = builder.requests_per_second(rps);
        }
        if let Some(secs) = parse_var::<u64>(vars::CACHE_TTL_SECS, get(vars::CACHE_TTL_SECS))? {
            builder = builder.cache_ttl(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if let Some(store) = &self.store {
            store.validate()?;
        }
        self.nse.validate()
    }

    /// Whether scrape results are persisted
    pub fn persistence_enabled(&self) -> bool {
        self.store.is_some()
    }
}

fn parse_var<T>(key: &str, raw: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })
    })
    .transpose()
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    store: Option<StoreConfig>,
    nse_base_url: Option<String>,
    request_timeout: Option<Duration>,
    warmup_delay: Option<Duration>,
    requests_per_second: Option<u32>,
    user_agent: Option<String>,
    cache_ttl: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enable persistence with the given store
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the NSE site root
    pub fn nse_base_url(mut self, url: impl Into<String>) -> Self {
        self.nse_base_url = Some(url.into());
        self
    }

    /// Set the upstream request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the pause between session bootstrap and API call
    pub fn warmup_delay(mut self, duration: Duration) -> Self {
        self.warmup_delay = Some(duration);
        self
    }

    /// Set outbound request pacing
    pub fn requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Override the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the scrape result cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            server: ServerConfig {
                host: self.host.unwrap_or(defaults.server.host),
                port: self.port.unwrap_or(defaults.server.port),
            },
            store: self.store,
            nse: NseConfig {
                base_url: self.nse_base_url.unwrap_or(defaults.nse.base_url),
                request_timeout: self.request_timeout.unwrap_or(defaults.nse.request_timeout),
                warmup_delay: self.warmup_delay.unwrap_or(defaults.nse.warmup_delay),
                requests_per_second: self
                    .requests_per_second
                    .unwrap_or(defaults.nse.requests_per_second),
                user_agent: self.user_agent.unwrap_or(defaults.nse.user_agent),
            },
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
        };

        config.validate()?;
        Ok(config)
    }
}
