//! Engine-neutral query specification.
//!
//! A [`QuerySpec`] is a plain data tree handed to a [`SearchEngine`](crate::engine::SearchEngine).
//! It carries no execution logic; each engine decides how to evaluate or translate it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Indexed course fields a predicate or sort can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CourseField {
    Title,
    Description,
    Category,
    Type,
    GradeRange,
    MinAge,
    MaxAge,
    Price,
    NextSessionDate,
}

impl CourseField {
    /// Field name as stored in the engine's documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseField::Title => "title",
            CourseField::Description => "description",
            CourseField::Category => "category",
            CourseField::Type => "type",
            CourseField::GradeRange => "gradeRange",
            CourseField::MinAge => "minAge",
            CourseField::MaxAge => "maxAge",
            CourseField::Price => "price",
            CourseField::NextSessionDate => "nextSessionDate",
        }
    }
}

impl fmt::Display for CourseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive range comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeOp {
    /// `field >= value`
    Gte,
    /// `field <= value`
    Lte,
}

/// Bound of a range filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    Int(i64),
    Float(f64),
    /// ISO-8601 date or date-time.
    Date(String),
}

/// A single node of the predicate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// No constraint.
    MatchAll,
    /// Analyzed match requiring exact tokens.
    TextMatch { field: CourseField, value: String },
    /// Analyzed match tolerating small edit distances per token.
    FuzzyMatch { field: CourseField, value: String },
    /// Field value starts with `value`.
    PrefixMatch { field: CourseField, value: String },
    RangeFilter {
        field: CourseField,
        op: RangeOp,
        value: RangeValue,
    },
    /// Keyword equality on an un-analyzed field.
    ExactFilter { field: CourseField, value: String },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn range(field: CourseField, op: RangeOp, value: RangeValue) -> Self {
        Predicate::RangeFilter { field, op, value }
    }

    pub fn exact(field: CourseField, value: impl Into<String>) -> Self {
        Predicate::ExactFilter {
            field,
            value: value.into(),
        }
    }

    /// Collapses a list of conjuncts: none is `MatchAll`, one is itself.
    pub fn all_of(mut nodes: Vec<Predicate>) -> Self {
        match nodes.len() {
            0 => Predicate::MatchAll,
            1 => nodes.remove(0),
            _ => Predicate::And(nodes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: CourseField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

/// Complete, engine-neutral description of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub predicate: Predicate,
    /// `None` leaves ordering to the engine's relevance ranking.
    pub sort: Option<SortSpec>,
    pub pagination: Pagination,
}
