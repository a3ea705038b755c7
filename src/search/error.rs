use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::engine::EngineError;

pub type SearchResult<T> = Result<T, SearchError>;

/// Failures surfaced to callers of the search and suggestion services.
///
/// Empty text or an empty prefix is not an error: both have defined
/// match-all / no-op behaviour.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Malformed request, rejected before it reaches the query builder.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The engine call failed or timed out. Never retried here.
    #[error("Search engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SearchError::InvalidRequest(_) => "INVALID_REQUEST",
            SearchError::EngineUnavailable(_) => "ENGINE_UNAVAILABLE",
        }
    }
}

impl From<EngineError> for SearchError {
    fn from(err: EngineError) -> Self {
        SearchError::EngineUnavailable(err.to_string())
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
