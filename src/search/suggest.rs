//! Title Autocomplete
//!
//! Runs a title prefix query through the engine and returns distinct titles in
//! the order the engine ranked them. Several offerings can share a title, so
//! the raw hit list routinely contains duplicates.

use std::collections::HashSet;
use std::sync::Arc;

use super::builder::QueryBuilder;
use super::error::SearchResult;
use super::types::SuggestionResult;
use crate::engine::SearchEngine;

/// Maximum number of suggestions returned per call.
pub const SUGGESTION_LIMIT: usize = 10;

pub struct SuggestionService {
    builder: QueryBuilder,
    engine: Arc<dyn SearchEngine>,
    limit: usize,
}

impl SuggestionService {
    pub fn new(engine: Arc<dyn SearchEngine>) -> Self {
        Self::with_limit(engine, SUGGESTION_LIMIT)
    }

    pub fn with_limit(engine: Arc<dyn SearchEngine>, limit: usize) -> Self {
        Self {
            builder: QueryBuilder::new(),
            engine,
            limit: limit.max(1),
        }
    }

    /// Returns up to `limit` distinct titles starting with `prefix`.
    ///
    /// An empty prefix short-circuits to an empty list without touching the
    /// engine. Engine failures propagate as `EngineUnavailable`.
    pub async fn suggest(&self, prefix: &str) -> SearchResult<SuggestionResult> {
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let spec = self.builder.prefix(prefix, self.limit);
        tracing::debug!("Suggestion query for '{}': {:?}", prefix, spec);

        let hits = self.engine.execute(&spec).await.map_err(|e| {
            tracing::error!("Suggestion query failed for '{}': {}", prefix, e);
            e
        })?;

        Ok(dedup_titles(
            hits.documents.into_iter().map(|doc| doc.title),
            self.limit,
        ))
    }
}

/// Keeps the first occurrence of each title, at most `limit` of them.
pub fn dedup_titles(titles: impl IntoIterator<Item = String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .filter(|title| seen.insert(title.clone()))
        .take(limit)
        .collect()
}
