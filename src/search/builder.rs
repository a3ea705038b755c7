//! Query Builder
//!
//! Translates a [`SearchRequest`] into a [`QuerySpec`]. Pure and total: every
//! validated request produces a spec, nothing here performs I/O.

use super::query::{
    CourseField, Pagination, Predicate, QuerySpec, RangeOp, RangeValue, SortDirection, SortSpec,
};
use super::types::SearchRequest;

/// Sort orders understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    #[default]
    Upcoming,
}

impl SortMode {
    /// Case-insensitive parse, no trimming. Anything unrecognised, including
    /// an absent value or surrounding whitespace, falls back to
    /// [`SortMode::Upcoming`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("priceAsc") => SortMode::PriceAsc,
            Some(s) if s.eq_ignore_ascii_case("priceDesc") => SortMode::PriceDesc,
            _ => SortMode::Upcoming,
        }
    }

    pub fn sort_spec(self) -> SortSpec {
        match self {
            SortMode::PriceAsc => SortSpec {
                field: CourseField::Price,
                direction: SortDirection::Asc,
            },
            SortMode::PriceDesc => SortSpec {
                field: CourseField::Price,
                direction: SortDirection::Desc,
            },
            SortMode::Upcoming => SortSpec {
                field: CourseField::NextSessionDate,
                direction: SortDirection::Asc,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the full search spec.
    ///
    /// Conjuncts are emitted in a fixed order: text, minAge, maxAge, minPrice,
    /// maxPrice, category, type, startDateFloor.
    pub fn build(&self, req: &SearchRequest) -> QuerySpec {
        let clauses = [
            present(&req.text).map(text_predicate),
            req.min_age.map(|v| {
                Predicate::range(CourseField::MinAge, RangeOp::Gte, RangeValue::Int(v.into()))
            }),
            req.max_age.map(|v| {
                Predicate::range(CourseField::MaxAge, RangeOp::Lte, RangeValue::Int(v.into()))
            }),
            req.min_price
                .map(|v| Predicate::range(CourseField::Price, RangeOp::Gte, RangeValue::Float(v))),
            req.max_price
                .map(|v| Predicate::range(CourseField::Price, RangeOp::Lte, RangeValue::Float(v))),
            present(&req.category).map(|v| Predicate::exact(CourseField::Category, v)),
            present(&req.course_type).map(|v| Predicate::exact(CourseField::Type, v)),
            present(&req.start_date_floor).map(|v| {
                Predicate::range(
                    CourseField::NextSessionDate,
                    RangeOp::Gte,
                    RangeValue::Date(v.to_string()),
                )
            }),
        ];

        QuerySpec {
            predicate: Predicate::all_of(clauses.into_iter().flatten().collect()),
            sort: Some(SortMode::parse(req.sort_mode.as_deref()).sort_spec()),
            pagination: Pagination {
                offset: req.page.saturating_mul(req.page_size),
                limit: req.page_size,
            },
        }
    }

    /// Builds the autocomplete spec: a single title prefix match, first page
    /// of `limit` hits, relevance order.
    pub fn prefix(&self, prefix: &str, limit: usize) -> QuerySpec {
        QuerySpec {
            predicate: Predicate::PrefixMatch {
                field: CourseField::Title,
                value: prefix.to_string(),
            },
            sort: None,
            pagination: Pagination { offset: 0, limit },
        }
    }
}

/// Title is matched fuzzily, description only on exact tokens.
fn text_predicate(text: &str) -> Predicate {
    Predicate::Or(vec![
        Predicate::FuzzyMatch {
            field: CourseField::Title,
            value: text.to_string(),
        },
        Predicate::TextMatch {
            field: CourseField::Description,
            value: text.to_string(),
        },
    ])
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
