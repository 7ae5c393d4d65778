//! SQLite-backed document store
//!
//! One row per company; the whole [`CompanyDocument`] is stored as JSON so
//! every upsert replaces the document in a single statement.

use async_trait::async_trait;
use filings_core::{CompanyDocument, DocumentStore, FilingsError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Document store persisted in a SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(unavailable)?;
        Self::with_connection(conn, collection)
    }

    /// Open a private in-memory database
    pub fn open_in_memory(collection: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::with_connection(conn, collection)
    }

    fn with_connection(conn: Connection, collection: &str) -> Result<Self> {
        let table = quote_identifier(collection)?;
        init_schema(&conn, &table).map_err(unavailable)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table,
        })
    }

    /// Run a statement on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let table = self.table.clone();

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| {
                FilingsError::StorageUnavailable("connection lock poisoned".to_string())
            })?;
            f(&guard, &table)
        })
        .await
        .map_err(|e| FilingsError::StorageUnavailable(format!("storage task failed: {e}")))?
    }
}

/// Schema definition
fn init_schema(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                company TEXT PRIMARY KEY NOT NULL,
                symbol TEXT,
                document TEXT NOT NULL,
                last_updated TEXT NOT NULL
            )"
        ),
        [],
    )?;
    Ok(())
}

/// Quote a collection name for use as a table identifier
fn quote_identifier(name: &str) -> Result<String> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(FilingsError::InvalidParameters(format!(
            "invalid collection name: {name:?}"
        )));
    }
    Ok(format!("\"{name}\""))
}

fn unavailable(err: rusqlite::Error) -> FilingsError {
    FilingsError::StorageUnavailable(err.to_string())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find_document(&self, company: &str) -> Result<Option<CompanyDocument>> {
        let company = company.to_string();

        self.with_conn(move |conn, table| {
            let raw: Option<String> = conn
                .query_row(
                    &format!("SELECT document FROM {table} WHERE company = ?1"),
                    params![company],
                    |row| row.get(0),
                )
                .optional()
                .map_err(unavailable)?;

            raw.map(|json| serde_json::from_str::<CompanyDocument>(&json).map_err(FilingsError::from))
                .transpose()
        })
        .await
    }

    async fn upsert_document(&self, document: &CompanyDocument) -> Result<()> {
        let json = serde_json::to_string(document)?;
        let company = document.company.clone();
        let symbol = document.symbol.clone();
        let last_updated = document.last_updated.to_rfc3339();

        self.with_conn(move |conn, table| {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (company, symbol, document, last_updated)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(company) DO UPDATE SET
                        symbol = excluded.symbol,
                        document = excluded.document,
                        last_updated = excluded.last_updated"
                ),
                params![company, symbol, json, last_updated],
            )
            .map_err(unavailable)?;
            debug!(company = %company, "Document written");
            Ok(())
        })
        .await
    }

    async fn list_companies(&self) -> Result<Vec<String>> {
        self.with_conn(|conn, table| {
            let mut stmt = conn
                .prepare(&format!("SELECT company FROM {table} ORDER BY company"))
                .map_err(unavailable)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(unavailable)?;

            let mut companies = Vec::new();
            for row in rows {
                companies.push(row.map_err(unavailable)?);
            }
            Ok(companies)
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.with_conn(|conn, _| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .map_err(unavailable)?;
            Ok(())
        })
        .await
    }
}
