use super::error::{SearchError, SearchResult};
use super::service::CourseSearchService;
use super::suggest::SuggestionService;
use super::types::{SearchRequest, SearchResponse, SuggestionResult};
use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default result window, matching the cluster's `index.max_result_window`.
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Transport-side limits applied before and around every engine call.
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Upper bound on `page * size + size`, the deepest hit a request may reach.
    pub max_result_window: usize,
    pub engine_timeout: Duration,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            default_page_size: super::types::DEFAULT_PAGE_SIZE,
            max_page_size: 100,
            max_result_window: MAX_RESULT_WINDOW,
            engine_timeout: Duration::from_secs(5),
        }
    }
}

/// Raw query string of `GET /api/search`.
///
/// Everything arrives as text so that malformed numbers produce the same
/// JSON error body as any other invalid request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub start_date: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// Coerces and validates the raw parameters.
    pub fn into_request(self, limits: &RequestLimits) -> SearchResult<SearchRequest> {
        let min_age = parse_param::<i32>("minAge", &self.min_age)?;
        let max_age = parse_param::<i32>("maxAge", &self.max_age)?;
        let min_price = parse_param::<f64>("minPrice", &self.min_price)?;
        let max_price = parse_param::<f64>("maxPrice", &self.max_price)?;
        let page = parse_param::<usize>("page", &self.page)?.unwrap_or(0);
        let page_size =
            parse_param::<usize>("size", &self.size)?.unwrap_or(limits.default_page_size);

        for (name, age) in [("minAge", min_age), ("maxAge", max_age)] {
            if matches!(age, Some(v) if v < 0) {
                return Err(invalid(format!("{} must not be negative", name)));
            }
        }
        for (name, price) in [("minPrice", min_price), ("maxPrice", max_price)] {
            if matches!(price, Some(v) if !v.is_finite() || v < 0.0) {
                return Err(invalid(format!("{} must be a non-negative number", name)));
            }
        }
        if let (Some(lo), Some(hi)) = (min_age, max_age) {
            if lo > hi {
                return Err(invalid("minAge must not exceed maxAge".to_string()));
            }
        }
        if let (Some(lo), Some(hi)) = (min_price, max_price) {
            if lo > hi {
                return Err(invalid("minPrice must not exceed maxPrice".to_string()));
            }
        }
        if page_size == 0 || page_size > limits.max_page_size {
            return Err(invalid(format!(
                "size must be between 1 and {}",
                limits.max_page_size
            )));
        }
        let window_end = page
            .checked_mul(page_size)
            .and_then(|offset| offset.checked_add(page_size));
        if !matches!(window_end, Some(end) if end <= limits.max_result_window) {
            return Err(invalid(format!(
                "page {} with size {} reaches past the first {} results",
                page, page_size, limits.max_result_window
            )));
        }

        let start_date_floor = non_empty(self.start_date);
        if let Some(date) = &start_date_floor {
            if crate::engine::parse_instant(date).is_none() {
                return Err(invalid(format!("startDate '{}' is not an ISO-8601 date", date)));
            }
        }

        Ok(SearchRequest {
            text: non_empty(self.q),
            min_age,
            max_age,
            category: non_empty(self.category),
            course_type: non_empty(self.course_type),
            min_price,
            max_price,
            start_date_floor,
            sort_mode: self.sort,
            page,
            page_size,
        })
    }
}

pub async fn handle_search(
    Query(params): Query<SearchParams>,
    Extension(service): Extension<Arc<CourseSearchService>>,
    Extension(limits): Extension<RequestLimits>,
) -> SearchResult<Json<SearchResponse>> {
    let req = params.into_request(&limits).map_err(|e| {
        tracing::debug!("Rejected search request: {}", e);
        e
    })?;

    let response = with_timeout(limits.engine_timeout, service.search(&req)).await?;
    tracing::debug!(
        "Search returned {} of {} hits",
        response.courses.len(),
        response.total
    );

    Ok(Json(response))
}

pub async fn handle_suggest(
    Query(params): Query<SuggestParams>,
    Extension(suggestions): Extension<Arc<SuggestionService>>,
    Extension(limits): Extension<RequestLimits>,
) -> SearchResult<Json<SuggestionResult>> {
    let prefix = params.q.unwrap_or_default();
    let titles = with_timeout(limits.engine_timeout, suggestions.suggest(&prefix)).await?;

    Ok(Json(titles))
}

pub async fn handle_health() -> &'static str {
    "ok"
}

/// Routes of the public search API.
pub fn router(
    service: Arc<CourseSearchService>,
    suggestions: Arc<SuggestionService>,
    limits: RequestLimits,
) -> Router {
    Router::new()
        .route("/api/search", get(handle_search))
        .route("/api/search/suggest", get(handle_suggest))
        .route("/health", get(handle_health))
        .layer(Extension(service))
        .layer(Extension(suggestions))
        .layer(Extension(limits))
}

async fn with_timeout<T>(
    timeout: Duration,
    call: impl Future<Output = SearchResult<T>>,
) -> SearchResult<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Engine call exceeded {:?}", timeout);
            Err(SearchError::EngineUnavailable(format!(
                "no response within {} ms",
                timeout.as_millis()
            )))
        }
    }
}

fn parse_param<T: FromStr>(name: &str, raw: &Option<String>) -> SearchResult<Option<T>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| invalid(format!("{} has an invalid value '{}'", name, s))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn invalid(message: String) -> SearchError {
    SearchError::InvalidRequest(message)
}
