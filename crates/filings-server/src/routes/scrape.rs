//! `GET /scrape`
//!
//! Query parameters: `index`, `from_date`, `to_date` (`DD-MM-YYYY`),
//! `symbol` and `force`. Fetch results are cached per query; ingestion runs
//! on every request since it is idempotent.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use filings_core::{FetchQuery, IngestError, IngestReport, Record};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeParams {
    pub index: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub symbol: Option<String>,
    pub force: Option<String>,
}

impl ScrapeParams {
    /// Validate the filters into a [`FetchQuery`]
    pub fn to_query(&self) -> filings_core::Result<FetchQuery> {
        FetchQuery::parse(
            self.index.as_deref(),
            self.from_date.as_deref(),
            self.to_date.as_deref(),
            self.symbol.as_deref(),
        )
    }

    /// `force=true` (or `1`/`yes`) bypasses the cache
    pub fn force(&self) -> bool {
        self.force
            .as_deref()
            .map(str::trim)
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
    }
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub count: usize,
    pub records: Vec<Record>,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub save_errors: Vec<IngestError>,
}

impl ScrapeResponse {
    fn new(records: Vec<Record>, from_cache: bool) -> Self {
        Self {
            success: true,
            count: records.len(),
            records,
            from_cache,
            saved: None,
            duplicates: None,
            rejected: None,
            save_errors: Vec::new(),
        }
    }

    fn with_report(mut self, report: IngestReport) -> Self {
        self.saved = Some(report.inserted);
        self.duplicates = Some(report.duplicates);
        self.rejected = Some(report.rejected);
        self.save_errors = report.errors;
        self
    }
}

/// `GET /scrape`
pub async fn scrape(
    State(state): State<AppState>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> AppResult<Json<ScrapeResponse>> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = params.to_query()?;

    let fetcher = state.fetcher.clone();
    let fetch_query = query.clone();
    let (records, from_cache) = state
        .cache
        .get_or_fetch(&query, params.force(), || async move {
            fetcher.fetch(&fetch_query).await
        })
        .await?;

    let mut response = ScrapeResponse::new(records, from_cache);

    if let Some(ingestor) = &state.ingestor {
        let report = ingestor.ingest_records(&response.records).await;
        if !report.is_clean() {
            warn!(failed = report.errors.len(), "Some companies could not be saved");
        }
        response = response.with_report(report);
    }

    info!(
        count = response.count,
        from_cache = response.from_cache,
        saved = response.saved.unwrap_or(0),
        "Scrape served"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DownStore, StubFetcher, sample_records, state, state_with_store};
    use std::sync::Arc;
    use filings_core::{CompanyDocument, DocumentStore, FilingsError, MemoryStore};

    fn params(pairs: &[(&str, &str)]) -> Result<Query<ScrapeParams>, QueryRejection> {
        let mut params = ScrapeParams::default();
        for (key, value) in pairs {
            let value = Some((*value).to_string());
            match *key {
                "index" => params.index = value,
                "from_date" => params.from_date = value,
                "to_date" => params.to_date = value,
                "symbol" => params.symbol = value,
                "force" => params.force = value,
                other => panic!("unknown param {other}"),
            }
        }
        Ok(Query(params))
    }

    #[tokio::test]
    async fn test_fetch_only_response() {
        let fetcher = StubFetcher::returning(sample_records());
        let state = state(fetcher.clone(), None);

        let Json(body) = scrape(State(state), params(&[])).await.unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert_eq!(json["from_cache"], false);
        assert_eq!(json["records"][0]["sm_name"], "Infosys Limited");
        assert!(json.get("saved").is_none());
        assert!(json.get("save_errors").is_none());
    }

    #[tokio::test]
    async fn test_persists_and_deduplicates() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::returning(sample_records());
        let state = state(fetcher.clone(), Some(store.clone()));

        let Json(first) = scrape(State(state.clone()), params(&[])).await.unwrap();
        assert_eq!(first.saved, Some(3));
        assert_eq!(first.duplicates, Some(0));
        assert_eq!(first.rejected, Some(0));

        let Json(second) = scrape(State(state), params(&[("force", "true")]))
            .await
            .unwrap();
        assert!(!second.from_cache);
        assert_eq!(second.saved, Some(0));
        assert_eq!(second.duplicates, Some(3));
        assert_eq!(fetcher.calls(), 2);

        let infosys: CompanyDocument = store.find_document("Infosys Limited").await.unwrap().unwrap();
        assert_eq!(infosys.len(), 2);
        assert_eq!(infosys.symbol.as_deref(), Some("INFY"));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let fetcher = StubFetcher::returning(sample_records());
        let state = state(fetcher.clone(), None);

        scrape(State(state.clone()), params(&[("symbol", "infy")])).await.unwrap();
        let Json(body) = scrape(State(state), params(&[("symbol", "INFY")])).await.unwrap();

        assert!(body.from_cache);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_params_rejected_before_fetch() {
        let fetcher = StubFetcher::returning(sample_records());
        let state = state(fetcher.clone(), None);

        let err = scrape(State(state), params(&[("from_date", "2025-10-01")]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_bad_gateway() {
        let fetcher = StubFetcher::failing(|| FilingsError::FetchFailure("403".into()));
        let state = state(fetcher, Some(MemoryStore::new()));

        let err = scrape(State(state), params(&[])).await.unwrap_err();
        assert!(matches!(err, AppError::BadGateway(_)));
    }

    #[tokio::test]
    async fn test_store_down_still_returns_records() {
        let state = state_with_store(StubFetcher::returning(sample_records()), Arc::new(DownStore));

        let Json(body) = scrape(State(state), params(&[])).await.unwrap();

        assert!(body.success);
        assert_eq!(body.count, 3);
        assert_eq!(body.records.len(), 3);
        assert_eq!(body.saved, Some(0));
        assert_eq!(body.duplicates, Some(0));

        let failed: Vec<_> = body.save_errors.iter().map(|e| e.company.as_str()).collect();
        assert_eq!(
            failed,
            vec!["Infosys Limited", "Tata Consultancy Services Limited"]
        );
        assert!(body.save_errors[0].error.contains("Storage unavailable"));

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["save_errors"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_rejected_records_counted() {
        let mut records = sample_records();
        records.extend(Record::from_value(serde_json::json!({"sm_name": "No Timestamp Ltd"})));
        let state = state(StubFetcher::returning(records), Some(MemoryStore::new()));

        let Json(body) = scrape(State(state), params(&[])).await.unwrap();
        assert_eq!(body.count, 4);
        assert_eq!(body.saved, Some(3));
        assert_eq!(body.rejected, Some(1));
    }

    #[test]
    fn test_force_flag() {
        let mut p = ScrapeParams::default();
        assert!(!p.force());
        p.force = Some("TRUE".into());
        assert!(p.force());
        p.force = Some("no".into());
        assert!(!p.force());
    }
}
