//! In-process search engine.
//!
//! Holds documents in a `DashMap` keyed by id and evaluates a `QuerySpec` by a
//! full scan. Matching follows the usual full-text conventions: analyzed
//! fields are tokenized, a match needs any one query token, keyword fields
//! compare verbatim. Relevance is the number of text clauses a document hit.

use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;

use super::tokenizer::{fuzzy_eq, tokenize_query, tokenize_text};
use super::{EngineError, SearchEngine, SearchHits, parse_instant};
use crate::search::query::{
    CourseField, Predicate, QuerySpec, RangeOp, RangeValue, SortDirection, SortSpec,
};
use crate::search::types::CourseDocument;

#[derive(Default)]
pub struct MemoryEngine {
    documents: DashMap<String, CourseDocument>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: impl IntoIterator<Item = CourseDocument>) -> Self {
        let engine = Self::new();
        for doc in documents {
            engine.documents.insert(doc.id.clone(), doc);
        }
        engine
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl SearchEngine for MemoryEngine {
    async fn execute(&self, spec: &QuerySpec) -> Result<SearchHits, EngineError> {
        let mut matched: Vec<(u32, CourseDocument)> = self
            .documents
            .iter()
            .filter_map(|entry| {
                let doc = entry.value();
                score(&spec.predicate, doc).map(|s| (s, doc.clone()))
            })
            .collect();

        // Ties fall back to id so paging stays stable across calls.
        match spec.sort {
            Some(sort) => matched.sort_by(|a, b| {
                compare(&a.1, &b.1, sort).then_with(|| a.1.id.cmp(&b.1.id))
            }),
            None => matched.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id))),
        }

        let total = matched.len() as u64;
        let documents = matched
            .into_iter()
            .skip(spec.pagination.offset)
            .take(spec.pagination.limit)
            .map(|(_, doc)| doc)
            .collect();

        Ok(SearchHits { total, documents })
    }

    async fn reset(&self) -> Result<(), EngineError> {
        self.documents.clear();
        Ok(())
    }

    async fn index(&self, documents: Vec<CourseDocument>) -> Result<usize, EngineError> {
        let count = documents.len();
        for doc in documents {
            self.documents.insert(doc.id.clone(), doc);
        }
        tracing::debug!("Indexed {} documents ({} total)", count, self.documents.len());
        Ok(count)
    }
}

/// `None` when the document does not satisfy the predicate, otherwise the
/// number of text clauses it matched.
pub fn score(predicate: &Predicate, doc: &CourseDocument) -> Option<u32> {
    match predicate {
        Predicate::MatchAll => Some(0),
        Predicate::TextMatch { field, value } => {
            let field_tokens = tokenize_text(text_of(doc, *field)?);
            tokenize_query(value)
                .iter()
                .any(|token| field_tokens.contains(token))
                .then_some(1)
        }
        Predicate::FuzzyMatch { field, value } => {
            let field_tokens = tokenize_text(text_of(doc, *field)?);
            tokenize_query(value)
                .iter()
                .any(|token| field_tokens.iter().any(|candidate| fuzzy_eq(token, candidate)))
                .then_some(1)
        }
        Predicate::PrefixMatch { field, value } => text_of(doc, *field)?
            .to_lowercase()
            .starts_with(&value.to_lowercase())
            .then_some(1),
        Predicate::ExactFilter { field, value } => {
            (text_of(doc, *field)? == value.as_str()).then_some(0)
        }
        Predicate::RangeFilter { field, op, value } => {
            in_range(doc, *field, *op, value).then_some(0)
        }
        Predicate::And(children) => children
            .iter()
            .map(|child| score(child, doc))
            .sum::<Option<u32>>(),
        Predicate::Or(children) => {
            let hits: Vec<u32> = children
                .iter()
                .filter_map(|child| score(child, doc))
                .collect();
            (!hits.is_empty()).then(|| hits.iter().sum())
        }
    }
}

fn text_of(doc: &CourseDocument, field: CourseField) -> Option<&str> {
    match field {
        CourseField::Title => Some(&doc.title),
        CourseField::Description => Some(&doc.description),
        CourseField::Category => Some(&doc.category),
        CourseField::Type => Some(&doc.course_type),
        CourseField::GradeRange => doc.grade_range.as_deref(),
        CourseField::NextSessionDate => Some(&doc.next_session_date),
        CourseField::MinAge | CourseField::MaxAge | CourseField::Price => None,
    }
}

fn number_of(doc: &CourseDocument, field: CourseField) -> Option<f64> {
    match field {
        CourseField::MinAge => Some(doc.min_age.into()),
        CourseField::MaxAge => Some(doc.max_age.into()),
        CourseField::Price => Some(doc.price),
        _ => None,
    }
}

fn in_range(doc: &CourseDocument, field: CourseField, op: RangeOp, bound: &RangeValue) -> bool {
    let ordering = match bound {
        RangeValue::Int(b) => number_of(doc, field).and_then(|v| v.partial_cmp(&(*b as f64))),
        RangeValue::Float(b) => number_of(doc, field).and_then(|v| v.partial_cmp(b)),
        RangeValue::Date(b) => {
            let value = text_of(doc, field).and_then(parse_instant);
            match (value, parse_instant(b)) {
                (Some(v), Some(b)) => Some(v.cmp(&b)),
                _ => None,
            }
        }
    };

    match (op, ordering) {
        (RangeOp::Gte, Some(ord)) => ord != Ordering::Less,
        (RangeOp::Lte, Some(ord)) => ord != Ordering::Greater,
        (_, None) => false,
    }
}

fn compare(a: &CourseDocument, b: &CourseDocument, sort: SortSpec) -> Ordering {
    let ord = match sort.field {
        CourseField::MinAge | CourseField::MaxAge | CourseField::Price => {
            let (x, y) = (number_of(a, sort.field), number_of(b, sort.field));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        CourseField::NextSessionDate => {
            let x = parse_instant(&a.next_session_date);
            let y = parse_instant(&b.next_session_date);
            // Unparsable dates sort last.
            match (x, y) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        _ => text_of(a, sort.field).cmp(&text_of(b, sort.field)),
    };

    match sort.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}
