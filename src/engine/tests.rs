//! Engine Module Tests
//!
//! ## Test Scopes
//! - **Tokenizer**: Normalisation, splitting and the edit-distance policy.
//! - **MemoryEngine**: Predicate evaluation, sorting, pagination and reindexing.
//! - **ElasticEngine**: Query DSL translation (no cluster needed).

#[cfg(test)]
mod tests {
    use crate::engine::elastic::{index_mapping, search_body, to_query_dsl};
    use crate::engine::memory::{MemoryEngine, score};
    use crate::engine::tokenizer::{allowed_edits, fuzzy_eq, tokenize_query, tokenize_text};
    use crate::engine::{SearchEngine, parse_instant};
    use crate::search::builder::QueryBuilder;
    use crate::search::query::{CourseField, Pagination, Predicate, QuerySpec, RangeOp, RangeValue};
    use crate::search::types::{CourseDocument, SearchRequest};
    use serde_json::json;

    fn doc(id: &str, title: &str, description: &str) -> CourseDocument {
        CourseDocument {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: "Music".to_string(),
            course_type: "CLUB".to_string(),
            grade_range: Some("5th-7th".to_string()),
            min_age: 10,
            max_age: 13,
            price: 50.0,
            next_session_date: "2025-08-25T16:00:00Z".to_string(),
        }
    }

    fn match_all(offset: usize, limit: usize) -> QuerySpec {
        QuerySpec {
            predicate: Predicate::MatchAll,
            sort: None,
            pagination: Pagination { offset, limit },
        }
    }

    // ============================================================
    // TOKENIZER TESTS
    // ============================================================

    #[test]
    fn test_tokenize_text_lowercase() {
        let tokens = tokenize_text("RUST Programming LANGUAGE");

        assert!(tokens.contains("rust"));
        assert!(tokens.contains("programming"));
        assert!(tokens.contains("language"));
        assert!(!tokens.contains("RUST"));
    }

    #[test]
    fn test_tokenize_text_removes_punctuation() {
        let tokens = tokenize_text("Hands-on experiments, to learn chemistry basics.");

        assert!(tokens.contains("hands"));
        assert!(tokens.contains("on"));
        assert!(tokens.contains("basics"));
        assert!(!tokens.contains("basics."));
    }

    #[test]
    fn test_tokenize_text_unique_tokens() {
        let tokens = tokenize_text("guitar guitar guitar lessons");

        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_tokenize_query_preserves_order_and_duplicates() {
        let tokens = tokenize_query("Web web Development");

        assert_eq!(tokens, vec!["web", "web", "development"]);
    }

    #[test]
    fn test_tokenize_keeps_unicode_and_numbers() {
        let tokens = tokenize_query("Książka 2024");

        assert_eq!(tokens, vec!["książka", "2024"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize_text("").is_empty());
        assert!(tokenize_query("  ,. ").is_empty());
    }

    #[test]
    fn test_allowed_edits_by_length() {
        assert_eq!(allowed_edits("ab"), 0);
        assert_eq!(allowed_edits("web"), 1);
        assert_eq!(allowed_edits("music"), 1);
        assert_eq!(allowed_edits("guitar"), 2);
    }

    #[test]
    fn test_fuzzy_eq() {
        assert!(fuzzy_eq("chemestry", "chemistry"));
        assert!(fuzzy_eq("gitar", "guitar"));
        assert!(!fuzzy_eq("wbe", "web"));
        assert!(fuzzy_eq("art", "arts"));
        assert!(!fuzzy_eq("ab", "ac"));
        assert!(!fuzzy_eq("poetry", "pottery-class"));
    }

    #[test]
    fn test_parse_instant_accepts_date_and_datetime() {
        let date = parse_instant("2025-09-01").unwrap();
        let datetime = parse_instant("2025-09-01T00:00:00Z").unwrap();
        let offset = parse_instant("2025-09-01T02:00:00+02:00").unwrap();

        assert_eq!(date, datetime);
        assert_eq!(datetime, offset);
        assert!(parse_instant("September").is_none());
    }

    // ============================================================
    // MEMORY ENGINE - predicate evaluation
    // ============================================================

    #[test]
    fn test_fuzzy_title_tolerates_typos() {
        let course = doc("c1", "Chemistry Experiments", "");
        let fuzzy = Predicate::FuzzyMatch {
            field: CourseField::Title,
            value: "Chemestry".to_string(),
        };
        let exact = Predicate::TextMatch {
            field: CourseField::Title,
            value: "Chemestry".to_string(),
        };

        assert_eq!(score(&fuzzy, &course), Some(1));
        assert_eq!(score(&exact, &course), None);
    }

    #[test]
    fn test_text_match_needs_any_token() {
        let course = doc(
            "c1",
            "Guitar Lessons",
            "Learn to play the guitar with expert instruction.",
        );
        let pred = Predicate::TextMatch {
            field: CourseField::Description,
            value: "violin instruction".to_string(),
        };

        assert_eq!(score(&pred, &course), Some(1));
    }

    #[test]
    fn test_exact_filter_is_case_sensitive() {
        let course = doc("c1", "Guitar Lessons", "");

        assert!(score(&Predicate::exact(CourseField::Category, "Music"), &course).is_some());
        assert!(score(&Predicate::exact(CourseField::Category, "music"), &course).is_none());
        assert!(score(&Predicate::exact(CourseField::GradeRange, "5th-7th"), &course).is_some());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let course = doc("c1", "Guitar Lessons", "");
        let check =
            |field, op, value| score(&Predicate::range(field, op, value), &course).is_some();

        assert!(check(CourseField::MinAge, RangeOp::Gte, RangeValue::Int(10)));
        assert!(!check(CourseField::MinAge, RangeOp::Gte, RangeValue::Int(11)));
        assert!(check(CourseField::MaxAge, RangeOp::Lte, RangeValue::Int(13)));
        assert!(!check(CourseField::MaxAge, RangeOp::Lte, RangeValue::Int(12)));
        assert!(check(CourseField::Price, RangeOp::Lte, RangeValue::Float(50.0)));
        assert!(!check(CourseField::Price, RangeOp::Gte, RangeValue::Float(50.01)));
        assert!(check(
            CourseField::NextSessionDate,
            RangeOp::Gte,
            RangeValue::Date("2025-08-25T16:00:00Z".to_string())
        ));
        assert!(!check(
            CourseField::NextSessionDate,
            RangeOp::Gte,
            RangeValue::Date("2025-08-26".to_string())
        ));
    }

    #[test]
    fn test_and_requires_all_or_requires_any() {
        let course = doc("c1", "Guitar Lessons", "");
        let music = Predicate::exact(CourseField::Category, "Music");
        let art = Predicate::exact(CourseField::Category, "Art");

        assert!(score(&Predicate::And(vec![music.clone(), art.clone()]), &course).is_none());
        assert!(score(&Predicate::Or(vec![music.clone(), art.clone()]), &course).is_some());
        assert!(score(&Predicate::Or(vec![art]), &course).is_none());
    }

    // ============================================================
    // MEMORY ENGINE - execution
    // ============================================================

    #[tokio::test]
    async fn test_execute_paginates_after_counting() {
        let engine = MemoryEngine::with_documents((0..7).map(|i| doc(&format!("c{}", i), "T", "")));

        let hits = engine.execute(&match_all(5, 5)).await.unwrap();

        assert_eq!(hits.total, 7);
        let ids: Vec<&str> = hits.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c5", "c6"]);
    }

    #[tokio::test]
    async fn test_execute_ranks_by_relevance_without_sort() {
        let engine = MemoryEngine::with_documents(vec![
            doc("a", "Piano Basics", "Learn guitar chords too"),
            doc("b", "Guitar Basics", "Guitar for beginners"),
            doc("c", "Drum Basics", "Rhythm"),
        ]);
        let spec = QuerySpec {
            sort: None,
            ..QueryBuilder::new().build(&SearchRequest {
                text: Some("guitar".to_string()),
                ..Default::default()
            })
        };

        let hits = engine.execute(&spec).await.unwrap();

        let ids: Vec<&str> = hits.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_reset_and_index_replace_contents() {
        let engine = MemoryEngine::with_documents(vec![doc("old", "Old", "")]);

        engine.reset().await.unwrap();
        assert!(engine.is_empty());

        let indexed = engine
            .index(vec![doc("a", "A", ""), doc("b", "B", ""), doc("a", "A2", "")])
            .await
            .unwrap();

        assert_eq!(indexed, 3);
        assert_eq!(engine.len(), 2);
        let hits = engine.execute(&match_all(0, 10)).await.unwrap();
        assert!(hits.documents.iter().any(|d| d.title == "A2"));
    }

    // ============================================================
    // ELASTIC ENGINE - DSL translation
    // ============================================================

    #[test]
    fn test_dsl_text_predicate() {
        let spec = QueryBuilder::new().build(&SearchRequest {
            text: Some("Chemestry".to_string()),
            ..Default::default()
        });

        assert_eq!(
            to_query_dsl(&spec.predicate),
            json!({
                "bool": {
                    "should": [
                        { "match": { "title": { "query": "Chemestry", "fuzziness": "AUTO" } } },
                        { "match": { "description": { "query": "Chemestry" } } }
                    ],
                    "minimum_should_match": 1
                }
            })
        );
    }

    #[test]
    fn test_dsl_filters_and_ranges() {
        let spec = QueryBuilder::new().build(&SearchRequest {
            min_age: Some(8),
            max_price: Some(40.5),
            category: Some("Art".to_string()),
            start_date_floor: Some("2025-09-01".to_string()),
            ..Default::default()
        });

        assert_eq!(
            to_query_dsl(&spec.predicate),
            json!({
                "bool": {
                    "must": [
                        { "range": { "minAge": { "gte": 8 } } },
                        { "range": { "price": { "lte": 40.5 } } },
                        { "term": { "category": "Art" } },
                        { "range": { "nextSessionDate": { "gte": "2025-09-01" } } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_search_body_carries_sort_and_pagination() {
        let spec = QueryBuilder::new().build(&SearchRequest {
            sort_mode: Some("priceDesc".to_string()),
            page: 2,
            page_size: 10,
            ..Default::default()
        });

        let body = search_body(&spec);

        assert_eq!(body["query"], json!({ "match_all": {} }));
        assert_eq!(body["from"], 20);
        assert_eq!(body["size"], 10);
        assert_eq!(body["sort"], json!([{ "price": { "order": "desc" } }]));
    }

    #[test]
    fn test_search_body_for_suggestions_has_no_sort() {
        let body = search_body(&QueryBuilder::new().prefix("Gui", 10));

        assert_eq!(
            body["query"],
            json!({ "match_phrase_prefix": { "title": { "query": "Gui" } } })
        );
        assert!(body.get("sort").is_none());
        assert_eq!(body["from"], 0);
    }

    #[test]
    fn test_index_mapping_declares_keyword_facets() {
        let mapping = index_mapping();
        let props = &mapping["mappings"]["properties"];

        assert_eq!(props["title"]["type"], "text");
        assert_eq!(props["category"]["type"], "keyword");
        assert_eq!(props["type"]["type"], "keyword");
        assert_eq!(props["nextSessionDate"]["type"], "date");
    }
}
