//! New-listing detection for the F&O securities list
//!
//! The last seen symbol list is kept in a small JSON snapshot file. Each run
//! compares the live list with the snapshot and then overwrites it.

use chrono::Utc;
use filings_core::{FilingsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Persisted symbol list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSnapshot {
    /// When the snapshot was taken (RFC 3339)
    pub timestamp: String,
    pub symbols: Vec<String>,
}

impl ListingSnapshot {
    /// Snapshot `symbols` as of now
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            symbols,
        }
    }

    /// Read a snapshot file
    ///
    /// A missing or unreadable file yields `None`; callers treat that as an
    /// empty previous list.
    pub async fn load(path: &Path) -> Option<Self> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), "Cannot read snapshot: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(path = %path.display(), "Ignoring corrupt snapshot: {}", e);
                None
            }
        }
    }

    /// Write the snapshot, replacing any previous file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await.map_err(|e| {
            FilingsError::StorageUnavailable(format!("cannot write {}: {e}", path.display()))
        })
    }
}

/// Symbols in `current` that are not in `previous`, in `current` order
pub fn new_listings(previous: &[String], current: &[String]) -> Vec<String> {
    let known: HashSet<&str> = previous.iter().map(String::as_str).collect();
    current
        .iter()
        .filter(|s| !known.contains(s.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_new_listings() {
        let previous = symbols(&["INFY", "TCS"]);
        let current = symbols(&["ZOMATO", "INFY", "TCS", "JIOFIN"]);
        assert_eq!(new_listings(&previous, &current), symbols(&["ZOMATO", "JIOFIN"]));
    }

    #[test]
    fn test_everything_new_without_history() {
        let current = symbols(&["INFY", "TCS"]);
        assert_eq!(new_listings(&[], &current), current);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nse_stock_list.json");

        let snapshot = ListingSnapshot::new(symbols(&["INFY", "TCS"]));
        snapshot.save(&path).await.unwrap();

        let loaded = ListingSnapshot::load(&path).await.unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_missing_and_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nse_stock_list.json");
        assert!(ListingSnapshot::load(&path).await.is_none());

        tokio::fs::write(&path, "{not json").await.unwrap();
        assert!(ListingSnapshot::load(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_without_symbols_key_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nse_stock_list.json");
        tokio::fs::write(&path, r#"{"timestamp": "2025-10-21T10:00:00"}"#)
            .await
            .unwrap();
        assert!(ListingSnapshot::load(&path).await.is_none());
    }
}
