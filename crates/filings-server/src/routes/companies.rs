//! `GET /companies/{company}`

use axum::Json;
use axum::extract::{Path, State};
use filings_core::CompanyDocument;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Persisted document for one company
///
/// 404 when the company has no document, 503 when persistence is off.
pub async fn get_company(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> AppResult<Json<CompanyDocument>> {
    let ingestor = state
        .ingestor
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("persistence is disabled".to_string()))?;

    let company = company.trim();
    if company.is_empty() {
        return Err(AppError::BadRequest("company must not be empty".to_string()));
    }

    ingestor
        .store()
        .find_document(company)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no document for company {company}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubFetcher, sample_records, state};
    use filings_core::{Ingestor, MemoryStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_existing_company() {
        let store = MemoryStore::new();
        Ingestor::new(Arc::new(store.clone()))
            .ingest_records(&sample_records())
            .await;
        let state = state(StubFetcher::returning(Vec::new()), Some(store));

        let Json(doc) = get_company(State(state), Path("Infosys Limited".to_string()))
            .await
            .unwrap();

        assert_eq!(doc.company, "Infosys Limited");
        assert_eq!(doc.len(), 2);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["announcements"][0]["timestamp"], "21-Oct-2025 21:41:32");
    }

    #[tokio::test]
    async fn test_unknown_company() {
        let state = state(StubFetcher::returning(Vec::new()), Some(MemoryStore::new()));
        let err = get_company(State(state), Path("ACME".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_persistence_disabled() {
        let state = state(StubFetcher::returning(Vec::new()), None);
        let err = get_company(State(state), Path("ACME".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }
}
