//! Deduplicating ingestion of fetched announcements
//!
//! The [`Ingestor`] merges announcements into one [`CompanyDocument`] per
//! company. The `(company, timestamp)` pair is the only deduplication key:
//! an announcement whose timestamp already exists in its company's document
//! is skipped, whatever its payload.

use crate::error::{FilingsError, Result};
use crate::model::{Announcement, CompanyDocument, MergeOutcome};
use crate::record::Record;
use crate::store::DocumentStore;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Failure to persist one company's announcements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestError {
    pub company: String,
    pub error: String,
}

/// Summary of a batch ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Announcements newly persisted
    pub inserted: usize,
    /// Announcements skipped as already seen
    pub duplicates: usize,
    /// Records that could not become announcements
    pub rejected: usize,
    /// Companies whose documents could not be persisted
    pub errors: Vec<IngestError>,
}

impl IngestReport {
    /// Whether every company was persisted
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Merges announcements into per-company documents held by a store
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn DocumentStore>,
}

impl Ingestor {
    /// Create an ingestor over a store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The backing store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Ingest announcements for one company
    ///
    /// Returns the number of newly inserted announcements. An empty input is
    /// a no-op and creates no document.
    pub async fn ingest(&self, company: &str, announcements: Vec<Announcement>) -> Result<usize> {
        self.ingest_with_outcome(company, announcements)
            .await
            .map(|outcome| outcome.inserted)
    }

    /// Like [`Ingestor::ingest`], also reporting skipped duplicates
    ///
    /// The document is written only when something new was inserted. Every
    /// announcement must belong to `company`.
    pub async fn ingest_with_outcome(
        &self,
        company: &str,
        announcements: Vec<Announcement>,
    ) -> Result<MergeOutcome> {
        let company = company.trim();
        if company.is_empty() {
            return Err(FilingsError::InvalidParameters(
                "company name must not be empty".to_string(),
            ));
        }
        if let Some(stray) = announcements.iter().find(|a| a.company() != company) {
            return Err(FilingsError::InvalidParameters(format!(
                "announcement for {} passed to {company}",
                stray.company()
            )));
        }
        if announcements.is_empty() {
            return Ok(MergeOutcome::default());
        }

        let mut document = self
            .store
            .find_document(company)
            .await?
            .unwrap_or_else(|| CompanyDocument::new(company));

        let outcome = document.merge(announcements);

        if outcome.inserted > 0 {
            document.last_updated = Utc::now();
            self.store.upsert_document(&document).await?;
            debug!(
                company,
                inserted = outcome.inserted,
                total = document.len(),
                "Document updated"
            );
        } else {
            debug!(company, duplicates = outcome.duplicates, "Nothing new");
        }

        Ok(outcome)
    }

    /// Convert, group and ingest a fetched batch
    ///
    /// Records without a company or timestamp are counted as rejected.
    /// Companies are processed in first-seen order; a storage failure for one
    /// company is recorded in the report and the rest are still attempted.
    pub async fn ingest_records(&self, records: &[Record]) -> IngestReport {
        let scraped_at = Utc::now();
        let mut report = IngestReport::default();
        let mut groups: Vec<(String, Vec<Announcement>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for record in records {
            match record.to_announcement(scraped_at) {
                Ok(announcement) => {
                    let company = announcement.company().to_string();
                    let slot = *positions.entry(company.clone()).or_insert_with(|| {
                        groups.push((company, Vec::new()));
                        groups.len() - 1
                    });
                    groups[slot].1.push(announcement);
                }
                Err(e) => {
                    debug!("Skipping record: {}", e);
                    report.rejected += 1;
                }
            }
        }

        for (company, announcements) in groups {
            match self.ingest_with_outcome(&company, announcements).await {
                Ok(outcome) => {
                    report.inserted += outcome.inserted;
                    report.duplicates += outcome.duplicates;
                }
                Err(e) => {
                    warn!(company = %company, "Ingestion aborted: {}", e);
                    report.errors.push(IngestError {
                        company,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            inserted = report.inserted,
            duplicates = report.duplicates,
            rejected = report.rejected,
            failed = report.errors.len(),
            "Batch ingested"
        );

        report
    }
}
