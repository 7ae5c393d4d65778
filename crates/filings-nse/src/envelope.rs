//! Response envelope handling
//!
//! The announcements endpoint has answered with a bare array, with
//! `{"data": [...]}` and with `{"records": [...]}` at different times.
//! A `data` or `records` key ends the search whatever it holds; any other
//! object is searched for its first non-empty array.

use filings_core::{FilingsError, Record, Result};
use serde_json::Value;
use tracing::debug;

/// Pull the record list out of an API response body
///
/// Non-object items inside the list are dropped. A body with no list, or
/// with an empty one, is [`FilingsError::NoRecords`].
pub fn extract_records(body: Value) -> Result<Vec<Record>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let key = ["data", "records"]
                .into_iter()
                .find(|k| map.contains_key(*k))
                .map(str::to_string)
                .or_else(|| {
                    map.iter()
                        .find(|(_, v)| v.as_array().is_some_and(|a| !a.is_empty()))
                        .map(|(k, _)| k.clone())
                });

            match key.and_then(|k| map.remove(&k)) {
                Some(Value::Array(items)) => items,
                _ => return Err(FilingsError::NoRecords),
            }
        }
        _ => return Err(FilingsError::NoRecords),
    };

    if items.is_empty() {
        return Err(FilingsError::NoRecords);
    }
    debug!(count = items.len(), "Found record list");

    let total = items.len();
    let records: Vec<Record> = items.into_iter().filter_map(Record::from_value).collect();
    if records.len() < total {
        debug!(dropped = total - records.len(), "Dropped non-object items");
    }

    Ok(records)
}
