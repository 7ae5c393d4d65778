//! Raw fetched records and their conversion into announcements
//!
//! Records come either in the canonical shape (`Company`, `Timestamp`, ...)
//! or straight from the NSE API (`sm_name`, `an_dt`, ...). Every canonical
//! field has a raw fallback key.

use crate::error::{FilingsError, Result};
use crate::model::{Announcement, Payload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys tried, in order, for the owning company
pub const COMPANY_KEYS: &[&str] = &["Company", "sm_name", "Symbol", "symbol"];

/// Keys tried, in order, for the identity timestamp
pub const TIMESTAMP_KEYS: &[&str] = &["Timestamp", "an_dt"];

/// Canonical payload field and its raw fallback
pub const PAYLOAD_FIELDS: &[(&str, &str)] = &[
    ("Symbol", "symbol"),
    ("Subject", "desc"),
    ("Description", "attchmntText"),
    ("Attachment_URL", "attchmntFile"),
    ("File_Size", "sm_size"),
    ("XBRL_Link", "xbrl"),
];

/// One fetched record, kept exactly as the upstream returned it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON object
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value; only objects are records
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Get a raw field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a non-blank string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get_str(key))
    }

    fn first_value(&self, keys: &[&str]) -> Value {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|v| !is_blank(v))
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Owning company name
    pub fn company(&self) -> Option<&str> {
        self.first_str(COMPANY_KEYS)
    }

    /// Identity timestamp
    pub fn timestamp(&self) -> Option<&str> {
        self.first_str(TIMESTAMP_KEYS)
    }

    /// Trading symbol
    pub fn symbol(&self) -> Option<&str> {
        self.first_str(&["Symbol", "symbol"])
    }

    /// Canonical payload, raw keys folded into their canonical names
    pub fn payload(&self) -> Payload {
        PAYLOAD_FIELDS
            .iter()
            .map(|&(canonical, raw)| (canonical.to_string(), self.first_value(&[canonical, raw])))
            .collect()
    }

    /// Convert at the ingestion boundary
    ///
    /// Fails with [`FilingsError::InvalidRecord`] when the record has no
    /// company or no timestamp.
    pub fn to_announcement(&self, scraped_at: DateTime<Utc>) -> Result<Announcement> {
        let company = self.company().ok_or_else(|| {
            FilingsError::InvalidRecord("record has no company or symbol".to_string())
        })?;
        let timestamp = self.timestamp().ok_or_else(|| {
            FilingsError::InvalidRecord(format!("record for {company} has no timestamp"))
        })?;

        Ok(Announcement::new(company, timestamp, self.payload())?.with_scraped_at(scraped_at))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
