//! Connection string parsing

use filings_core::{FilingsError, Result};
use std::fmt;
use std::path::PathBuf;

/// Where a store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    SqliteMemory,
    SqliteFile(PathBuf),
}

impl StoreLocation {
    /// Parse a store connection string
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();

        if url == "memory://" {
            return Ok(Self::Memory);
        }
        if url == "sqlite::memory:" {
            return Ok(Self::SqliteMemory);
        }
        if let Some(path) = url.strip_prefix("sqlite://") {
            if path.is_empty() {
                return Err(FilingsError::InvalidParameters(
                    "sqlite url has no path".to_string(),
                ));
            }
            return Ok(Self::SqliteFile(PathBuf::from(path)));
        }

        Err(FilingsError::InvalidParameters(format!(
            "unsupported store url: {url}"
        )))
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory://"),
            Self::SqliteMemory => write!(f, "sqlite::memory:"),
            Self::SqliteFile(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(StoreLocation::parse("memory://").unwrap(), StoreLocation::Memory);
        assert_eq!(
            StoreLocation::parse(" sqlite::memory: ").unwrap(),
            StoreLocation::SqliteMemory
        );
        assert_eq!(
            StoreLocation::parse("sqlite:///var/lib/filings.db").unwrap(),
            StoreLocation::SqliteFile(PathBuf::from("/var/lib/filings.db"))
        );
        assert_eq!(
            StoreLocation::parse("sqlite://data/filings.db").unwrap(),
            StoreLocation::SqliteFile(PathBuf::from("data/filings.db"))
        );
    }

    #[test]
    fn test_parse_rejects() {
        assert!(StoreLocation::parse("sqlite://").is_err());
        assert!(StoreLocation::parse("postgres://localhost/db").is_err());
        assert!(StoreLocation::parse("").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for url in ["memory://", "sqlite::memory:", "sqlite://data/filings.db"] {
            assert_eq!(StoreLocation::parse(url).unwrap().to_string(), url);
        }
    }
}
