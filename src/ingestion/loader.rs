use anyhow::{Context, Result};
use std::path::Path;

use crate::engine::SearchEngine;
use crate::search::types::CourseDocument;

/// Parses a JSON array of course documents, filling in missing ids.
pub fn parse_courses(json: &str) -> Result<Vec<CourseDocument>> {
    let mut courses: Vec<CourseDocument> =
        serde_json::from_str(json).context("Course data is not a JSON array of courses")?;

    for course in courses.iter_mut().filter(|c| c.id.is_empty()) {
        course.id = uuid::Uuid::new_v4().to_string();
    }

    Ok(courses)
}

/// Replaces the engine's contents with `courses`.
pub async fn load_courses(
    engine: &dyn SearchEngine,
    courses: Vec<CourseDocument>,
) -> Result<usize> {
    engine.reset().await.context("Failed to reset the course index")?;
    let indexed = engine
        .index(courses)
        .await
        .context("Failed to index courses")?;

    tracing::info!("Loaded {} courses into the index", indexed);
    Ok(indexed)
}

/// Reads `path` and loads its courses into the engine.
pub async fn load_file(engine: &dyn SearchEngine, path: &Path) -> Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read course data from {}", path.display()))?;

    let courses = parse_courses(&raw)?;
    tracing::debug!("Parsed {} courses from {}", courses.len(), path.display());

    load_courses(engine, courses).await
}
