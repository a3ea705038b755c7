//! Search Data Types
//!
//! Request, document and response structures shared by the query builder,
//! the engines and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A validated, loosely-typed search request.
///
/// Every `None` field contributes no constraint. The transport layer is
/// responsible for rejecting negative bounds and zero page sizes before a
/// request is built.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free text matched against title (fuzzy) and description (exact tokens).
    pub text: Option<String>,
    /// Inclusive lower bound on the course's minimum age.
    pub min_age: Option<i32>,
    /// Inclusive upper bound on the course's maximum age.
    pub max_age: Option<i32>,
    /// Exact category keyword.
    pub category: Option<String>,
    /// Exact course type keyword (e.g. `COURSE`, `CLUB`, `ONE_TIME`).
    pub course_type: Option<String>,
    /// Inclusive lower bound on price.
    pub min_price: Option<f64>,
    /// Inclusive upper bound on price.
    pub max_price: Option<f64>,
    /// ISO-8601 date or date-time; sessions on or after it match.
    pub start_date_floor: Option<String>,
    /// Raw sort mode, compared case-insensitively. Unknown values sort by date.
    pub sort_mode: Option<String>,
    /// Zero-based page index.
    pub page: usize,
    /// Number of hits per page, at least 1.
    pub page_size: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            text: None,
            min_age: None,
            max_age: None,
            category: None,
            course_type: None,
            min_price: None,
            max_price: None,
            start_date_floor: None,
            sort_mode: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A course as stored in (and returned by) the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub course_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_range: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub price: f64,
    pub next_session_date: String,
}

/// Read-only projection of a [`CourseDocument`] returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub next_session_date: String,
}

impl From<&CourseDocument> for CourseSummary {
    fn from(doc: &CourseDocument) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            category: doc.category.clone(),
            price: doc.price,
            next_session_date: doc.next_session_date.clone(),
        }
    }
}

/// Body of `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub courses: Vec<CourseSummary>,
}

/// Ordered, duplicate-free title suggestions.
pub type SuggestionResult = Vec<String>;
