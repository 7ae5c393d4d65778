//! Mapping of failures to HTTP responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filings_core::FilingsError;
use serde_json::json;

/// Application error type with HTTP response mapping
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Upstream site failed (502)
    #[error("{0}")]
    BadGateway(String),

    /// A required backend is missing or down (503)
    #[error("{0}")]
    Unavailable(String),

    /// Anything else (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FilingsError> for AppError {
    fn from(err: FilingsError) -> Self {
        let message = err.to_string();
        match err {
            FilingsError::InvalidParameters(_) | FilingsError::InvalidRecord(_) => {
                Self::BadRequest(message)
            }
            FilingsError::NoRecords => Self::NotFound(message),
            FilingsError::FetchFailure(_) => Self::BadGateway(message),
            FilingsError::StorageUnavailable(_) => Self::Unavailable(message),
            FilingsError::Serialization(_) => Self::Internal(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filings_error_mapping() {
        let cases = [
            (FilingsError::InvalidParameters("x".into()), StatusCode::BAD_REQUEST),
            (FilingsError::FetchFailure("x".into()), StatusCode::BAD_GATEWAY),
            (FilingsError::NoRecords, StatusCode::NOT_FOUND),
            (FilingsError::StorageUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_message_preserved() {
        let err = AppError::from(FilingsError::FetchFailure("timed out".into()));
        assert_eq!(err.to_string(), "Fetch failed: timed out");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::NotFound("no document".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
