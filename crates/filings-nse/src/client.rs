//! NSE HTTP client
//!
//! Requests are paced client-side; there is no retry. Any transport error,
//! non-200 status or unreadable body becomes
//! [`FilingsError::FetchFailure`].

use async_trait::async_trait;
use filings_core::{FetchQuery, Fetcher, FilingsError, Record, Result};
use filings_utils::NseConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::envelope::extract_records;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Site paths relative to the base URL
pub mod paths {
    pub const HOME: &str = "/";
    pub const ANNOUNCEMENTS_PAGE: &str = "/companies-listing/corporate-filings-announcements";
    pub const ANNOUNCEMENTS_API: &str = "/api/corporate-announcements";
    pub const INDEX_CONSTITUENTS_API: &str = "/api/equity-stockIndices";
    pub const LIVE_MARKET_PAGE: &str = "/market-data/live-equity-market";
}

/// Index whose constituents are tracked for new listings
pub const FNO_INDEX: &str = "SECURITIES IN F&O";

#[derive(Debug, Deserialize)]
struct IndexConstituents {
    #[serde(default)]
    data: Vec<Constituent>,
}

#[derive(Debug, Deserialize)]
struct Constituent {
    symbol: String,
}

/// Client for the NSE website's JSON endpoints
#[derive(Clone)]
pub struct NseClient {
    http: Client,
    base: Url,
    warmup_delay: Duration,
    rate_limiter: SharedRateLimiter,
}

impl NseClient {
    /// Create a client from its configuration
    ///
    /// The client keeps a cookie jar for the lifetime of the value.
    pub fn new(config: &NseConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            FilingsError::InvalidParameters(format!("invalid base url {}: {e}", config.base_url))
        })?;

        let rps = NonZeroU32::new(config.requests_per_second).ok_or_else(|| {
            FilingsError::InvalidParameters("requests_per_second must be greater than 0".into())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FilingsError::FetchFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            warmup_delay: config.warmup_delay,
            rate_limiter,
        })
    }

    /// Site root all paths are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an absolute or site-relative URL
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base
            .join(url)
            .map_err(|e| FilingsError::InvalidParameters(format!("invalid url {url}: {e}")))
    }

    async fn get(
        &self,
        url: Url,
        query: &[(&str, String)],
        referer: Option<&str>,
    ) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let mut request = self.http.get(url.clone()).query(query);
        if let Some(referer) = referer {
            request = request.header(REFERER, self.resolve(referer)?.as_str());
        }

        debug!(url = %url, ?query, "GET");
        let response = request
            .send()
            .await
            .map_err(|e| FilingsError::FetchFailure(format!("request to {url} failed: {e}")))?;

        match response.status() {
            StatusCode::OK => Ok(response),
            status => Err(FilingsError::FetchFailure(format!(
                "{} returned status {status}",
                url.path()
            ))),
        }
    }

    /// Load a regular page so the session picks up its cookies
    pub async fn bootstrap_session(&self, page: &str) -> Result<()> {
        let url = self.resolve(page)?;
        self.get(url, &[], None).await?;
        debug!(page, "Session cookies obtained");

        if !self.warmup_delay.is_zero() {
            tokio::time::sleep(self.warmup_delay).await;
        }
        Ok(())
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        referer: &str,
    ) -> Result<serde_json::Value> {
        let url = self.resolve(path)?;
        let response = self.get(url, query, Some(referer)).await?;
        response
            .json()
            .await
            .map_err(|e| FilingsError::FetchFailure(format!("invalid JSON from {path}: {e}")))
    }

    /// Fetch corporate announcements matching `query`
    pub async fn fetch_announcements(&self, query: &FetchQuery) -> Result<Vec<Record>> {
        query.validate()?;
        self.bootstrap_session(paths::ANNOUNCEMENTS_PAGE).await?;

        let body = self
            .get_json(
                paths::ANNOUNCEMENTS_API,
                &query.query_pairs(),
                paths::ANNOUNCEMENTS_PAGE,
            )
            .await?;
        let records = extract_records(body)?;

        info!(
            index = %query.index,
            symbol = query.symbol.as_deref().unwrap_or("-"),
            count = records.len(),
            "Fetched announcements"
        );
        Ok(records)
    }

    /// Symbols currently in the F&O securities list
    pub async fn fno_symbols(&self) -> Result<Vec<String>> {
        self.bootstrap_session(paths::HOME).await?;

        let body = self
            .get_json(
                paths::INDEX_CONSTITUENTS_API,
                &[("index", FNO_INDEX.to_string())],
                paths::LIVE_MARKET_PAGE,
            )
            .await?;
        let constituents: IndexConstituents = serde_json::from_value(body).map_err(|e| {
            FilingsError::FetchFailure(format!("unexpected index constituents shape: {e}"))
        })?;

        let symbols: Vec<String> = constituents.data.into_iter().map(|c| c.symbol).collect();
        if symbols.is_empty() {
            return Err(FilingsError::FetchFailure(
                "no stock data received".to_string(),
            ));
        }
        Ok(symbols)
    }

    /// Download an announcement attachment to `dest`
    ///
    /// Relative URLs are resolved against the base URL. Returns the number
    /// of bytes written.
    pub async fn download_attachment(&self, url: &str, dest: &Path) -> Result<u64> {
        let url = self.resolve(url)?;
        let response = self.get(url.clone(), &[], None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FilingsError::FetchFailure(format!("failed to read {url}: {e}")))?;

        tokio::fs::write(dest, &bytes).await.map_err(|e| {
            FilingsError::StorageUnavailable(format!("cannot write {}: {e}", dest.display()))
        })?;

        info!(url = %url, path = %dest.display(), bytes = bytes.len(), "Attachment downloaded");
        Ok(bytes.len() as u64)
    }
}

#[async_trait]
impl Fetcher for NseClient {
    async fn fetch(&self, query: &FetchQuery) -> Result<Vec<Record>> {
        self.fetch_announcements(query).await
    }
}
