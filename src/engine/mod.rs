//! Search Engine Module
//!
//! The execution side of a query. The search and suggestion services only see
//! the [`SearchEngine`] trait; concrete engines decide how a
//! [`QuerySpec`](crate::search::query::QuerySpec) is evaluated.
//!
//! ## Submodules
//! - **`memory`**: In-process engine over a `DashMap`, used by default and in tests.
//! - **`elastic`**: Client for an Elasticsearch-compatible cluster, speaking its query DSL.
//! - **`tokenizer`**: Text normalisation and edit-distance helpers for the in-process engine.

pub mod elastic;
pub mod memory;
pub mod tokenizer;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::search::query::QuerySpec;
use crate::search::types::CourseDocument;

/// Result of one query: total matches before pagination and the requested page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub total: u64,
    pub documents: Vec<CourseDocument>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine unreachable: {0}")]
    Unreachable(String),

    #[error("engine timed out")]
    Timeout,

    #[error("unexpected engine response: {0}")]
    BadResponse(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Timeout
        } else if err.is_decode() {
            EngineError::BadResponse(err.to_string())
        } else {
            EngineError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Applies the predicate, sort and pagination of `spec`.
    async fn execute(&self, spec: &QuerySpec) -> Result<SearchHits, EngineError>;

    /// Drops every indexed document.
    async fn reset(&self) -> Result<(), EngineError>;

    /// Adds or replaces documents by id. Returns how many were indexed.
    async fn index(&self, documents: Vec<CourseDocument>) -> Result<usize, EngineError>;
}

/// Parses an RFC 3339 date-time or a plain `YYYY-MM-DD` date (as midnight UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
