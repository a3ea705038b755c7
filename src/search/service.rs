use std::sync::Arc;

use super::builder::QueryBuilder;
use super::error::SearchResult;
use super::types::{CourseSummary, SearchRequest, SearchResponse};
use crate::engine::SearchEngine;

/// Keyword and faceted course search.
///
/// Builds the query, runs it through the engine once and projects the hits
/// into summaries. Holds no state besides its engine handle.
pub struct CourseSearchService {
    builder: QueryBuilder,
    engine: Arc<dyn SearchEngine>,
}

impl CourseSearchService {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self {
            builder: QueryBuilder::new(),
            engine,
        }
    }

    pub async fn search(&self, req: &SearchRequest) -> SearchResult<SearchResponse> {
        let spec = self.builder.build(req);
        tracing::debug!("Search query: {:?}", spec);

        let hits = self.engine.execute(&spec).await.map_err(|e| {
            tracing::error!("Search query failed: {}", e);
            e
        })?;

        Ok(SearchResponse {
            total: hits.total,
            courses: hits.documents.iter().map(CourseSummary::from).collect(),
        })
    }
}
