//! Fetch filters

use crate::error::{FilingsError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Filters forwarded to a [`Fetcher`](crate::Fetcher)
///
/// Built through [`FetchQuery::parse`], which validates everything before a
/// fetch is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchQuery {
    pub index: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub symbol: Option<String>,
}

impl Default for FetchQuery {
    fn default() -> Self {
        Self {
            index: Self::DEFAULT_INDEX.to_string(),
            from_date: None,
            to_date: None,
            symbol: None,
        }
    }
}

impl FetchQuery {
    pub const DEFAULT_INDEX: &'static str = "equities";

    /// Date format used on the wire, e.g. `21-10-2025`
    pub const DATE_FORMAT: &'static str = "%d-%m-%Y";

    /// Validate raw filter strings
    ///
    /// Blank values count as absent. `index` defaults to `equities`; dates
    /// are `DD-MM-YYYY`; symbols are upper-cased.
    pub fn parse(
        index: Option<&str>,
        from_date: Option<&str>,
        to_date: Option<&str>,
        symbol: Option<&str>,
    ) -> Result<Self> {
        let index = match non_blank(index) {
            Some(index) => validate_index(index)?,
            None => Self::DEFAULT_INDEX.to_string(),
        };
        let from_date = non_blank(from_date)
            .map(|d| parse_date("from_date", d))
            .transpose()?;
        let to_date = non_blank(to_date)
            .map(|d| parse_date("to_date", d))
            .transpose()?;
        let symbol = non_blank(symbol).map(validate_symbol).transpose()?;

        let query = Self {
            index,
            from_date,
            to_date,
            symbol,
        };
        query.validate()?;
        Ok(query)
    }

    /// Restrict to a single trading day
    pub fn for_day(date: NaiveDate) -> Self {
        Self {
            from_date: Some(date),
            to_date: Some(date),
            ..Self::default()
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(FilingsError::InvalidParameters(format!(
                    "from_date {} is after to_date {}",
                    from.format(Self::DATE_FORMAT),
                    to.format(Self::DATE_FORMAT)
                )));
            }
        }
        Ok(())
    }

    /// Query-string pairs in the upstream's format
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("index", self.index.clone())];
        if let Some(from) = self.from_date {
            pairs.push(("from_date", from.format(Self::DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("to_date", to.format(Self::DATE_FORMAT).to_string()));
        }
        if let Some(symbol) = &self.symbol {
            pairs.push(("symbol", symbol.clone()));
        }
        pairs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn validate_index(index: &str) -> Result<String> {
    let valid = index
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if valid {
        Ok(index.to_string())
    } else {
        Err(FilingsError::InvalidParameters(format!(
            "index must be lowercase letters or digits, got {index:?}"
        )))
    }
}

fn validate_symbol(symbol: &str) -> Result<String> {
    let valid = symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '&' | '-' | '_'));
    if valid {
        Ok(symbol.to_ascii_uppercase())
    } else {
        Err(FilingsError::InvalidParameters(format!(
            "invalid symbol {symbol:?}"
        )))
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, FetchQuery::DATE_FORMAT).map_err(|e| {
        FilingsError::InvalidParameters(format!(
            "{field} must be DD-MM-YYYY, got {value:?} ({e})"
        ))
    })
}
