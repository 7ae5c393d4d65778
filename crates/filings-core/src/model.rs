//! Announcement and company document types

use crate::error::{FilingsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Semi-structured announcement fields
///
/// A string-keyed map of JSON values. Scalars and nested values are kept
/// as fetched; nothing in the payload takes part in deduplication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Payload::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a non-empty string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the payload has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Unwrap into the underlying JSON map
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single announcement tied to a company and a timestamp
///
/// `timestamp` is the identity key within a company: it is compared as an
/// opaque string and never reparsed. Deserialization goes through the same
/// checks as [`Announcement::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAnnouncement")]
pub struct Announcement {
    company: String,
    timestamp: String,
    payload: Payload,
    scraped_at: DateTime<Utc>,
}

impl Announcement {
    /// Create an announcement scraped now
    ///
    /// Both `company` and `timestamp` must be non-blank.
    pub fn new(
        company: impl Into<String>,
        timestamp: impl Into<String>,
        payload: Payload,
    ) -> Result<Self> {
        let company = company.into().trim().to_string();
        let timestamp = timestamp.into().trim().to_string();

        if company.is_empty() {
            return Err(FilingsError::InvalidRecord(
                "announcement has no company".to_string(),
            ));
        }
        if timestamp.is_empty() {
            return Err(FilingsError::InvalidRecord(format!(
                "announcement for {company} has no timestamp"
            )));
        }

        Ok(Self {
            company,
            timestamp,
            payload,
            scraped_at: Utc::now(),
        })
    }

    /// Override the scrape time
    pub fn with_scraped_at(mut self, scraped_at: DateTime<Utc>) -> Self {
        self.scraped_at = scraped_at;
        self
    }

    /// Owning company name
    pub fn company(&self) -> &str {
        &self.company
    }

    /// Identity timestamp within the company
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Announcement fields
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// When the announcement was fetched
    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    /// Trading symbol carried in the payload, if any
    pub fn symbol(&self) -> Option<&str> {
        self.payload.get_str("Symbol")
    }
}

/// Announcement as stored, before validation
#[derive(Deserialize)]
struct RawAnnouncement {
    company: String,
    timestamp: String,
    #[serde(default)]
    payload: Payload,
    scraped_at: DateTime<Utc>,
}

impl TryFrom<RawAnnouncement> for Announcement {
    type Error = FilingsError;

    fn try_from(raw: RawAnnouncement) -> Result<Self> {
        Ok(Self::new(raw.company, raw.timestamp, raw.payload)?.with_scraped_at(raw.scraped_at))
    }
}

/// Result of merging announcements into a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Announcements appended to the document
    pub inserted: usize,
    /// Announcements skipped because their timestamp was already present
    pub duplicates: usize,
}

/// All announcements persisted for one company
///
/// Keyed by `company`. Announcements are kept in arrival order and no two
/// share a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDocument {
    pub company: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    pub last_updated: DateTime<Utc>,
}

impl CompanyDocument {
    /// Create an empty document for a company
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            symbol: None,
            announcements: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Whether an announcement with this timestamp is already stored
    pub fn contains_timestamp(&self, timestamp: &str) -> bool {
        self.announcements.iter().any(|a| a.timestamp() == timestamp)
    }

    /// Append every announcement whose timestamp is not yet present
    ///
    /// Timestamps introduced earlier in the same call count as present, so
    /// the first of two same-timestamp announcements wins.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Announcement>) -> MergeOutcome {
        let mut seen: HashSet<String> = self
            .announcements
            .iter()
            .map(|a| a.timestamp().to_string())
            .collect();
        let mut outcome = MergeOutcome::default();

        for announcement in incoming {
            if !seen.insert(announcement.timestamp().to_string()) {
                outcome.duplicates += 1;
                continue;
            }
            if let Some(symbol) = announcement.symbol() {
                self.symbol = Some(symbol.to_string());
            }
            self.announcements.push(announcement);
            outcome.inserted += 1;
        }

        outcome
    }

    /// Number of stored announcements
    pub fn len(&self) -> usize {
        self.announcements.len()
    }

    /// Check if no announcement is stored
    pub fn is_empty(&self) -> bool {
        self.announcements.is_empty()
    }
}
