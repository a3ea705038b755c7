//! Elasticsearch-compatible engine client.
//!
//! Translates a [`QuerySpec`] into the cluster's JSON query DSL and talks to it
//! over HTTP. The translation is a pure function so it can be checked without
//! a running cluster.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;

use super::{EngineError, SearchEngine, SearchHits};
use crate::search::query::{Predicate, QuerySpec, RangeOp, RangeValue, SortDirection};
use crate::search::types::CourseDocument;

pub const DEFAULT_INDEX: &str = "courses";

pub struct ElasticEngine {
    base_url: String,
    index: String,
    http_client: reqwest::Client,
}

impl ElasticEngine {
    pub fn new(
        base_url: &str,
        index: &str,
        request_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", self.base_url, self.index, path)
    }
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    hits: HitsBody,
}

#[derive(Debug, Deserialize)]
struct HitsBody {
    total: TotalBody,
    hits: Vec<HitBody>,
}

#[derive(Debug, Deserialize)]
struct TotalBody {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct HitBody {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: CourseDocument,
}

#[async_trait]
impl SearchEngine for ElasticEngine {
    async fn execute(&self, spec: &QuerySpec) -> Result<SearchHits, EngineError> {
        let body = search_body(spec);
        tracing::debug!("POST {} {}", self.url("/_search"), body);

        let response = self
            .http_client
            .post(self.url("/_search"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(EngineError::BadResponse(format!("{}: {}", status, text)));
        }

        let parsed: SearchBody = response.json().await?;
        let documents = parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let mut doc = hit.source;
                if doc.id.is_empty() {
                    doc.id = hit.id;
                }
                doc
            })
            .collect();

        Ok(SearchHits {
            total: parsed.hits.total.value,
            documents,
        })
    }

    async fn reset(&self) -> Result<(), EngineError> {
        let deleted = self.http_client.delete(self.url("")).send().await?;
        if !deleted.status().is_success() && deleted.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::BadResponse(format!(
                "delete index returned {}",
                deleted.status()
            )));
        }

        let created = self
            .http_client
            .put(self.url(""))
            .json(&index_mapping())
            .send()
            .await?;
        if !created.status().is_success() {
            return Err(EngineError::BadResponse(format!(
                "create index returned {}",
                created.status()
            )));
        }

        tracing::info!("Recreated index '{}'", self.index);
        Ok(())
    }

    async fn index(&self, documents: Vec<CourseDocument>) -> Result<usize, EngineError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let count = documents.len();
        let body = bulk_body(&documents)?;
        let response = self
            .http_client
            .post(self.url("/_bulk?refresh=true"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let summary: Value = response.json().await?;
        if !status.is_success() || summary["errors"].as_bool().unwrap_or(false) {
            return Err(EngineError::BadResponse(format!(
                "bulk index returned {} (errors: {})",
                status, summary["errors"]
            )));
        }

        Ok(count)
    }
}

/// Full `_search` request body for `spec`.
pub fn search_body(spec: &QuerySpec) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), to_query_dsl(&spec.predicate));
    body.insert("from".to_string(), json!(spec.pagination.offset));
    body.insert("size".to_string(), json!(spec.pagination.limit));
    body.insert("track_total_hits".to_string(), json!(true));

    if let Some(sort) = spec.sort {
        let order = match sort.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        body.insert(
            "sort".to_string(),
            json!([{ sort.field.as_str(): { "order": order } }]),
        );
    }

    Value::Object(body)
}

pub fn to_query_dsl(predicate: &Predicate) -> Value {
    match predicate {
        Predicate::MatchAll => json!({ "match_all": {} }),
        Predicate::TextMatch { field, value } => {
            json!({ "match": { field.as_str(): { "query": value } } })
        }
        Predicate::FuzzyMatch { field, value } => {
            json!({ "match": { field.as_str(): { "query": value, "fuzziness": "AUTO" } } })
        }
        Predicate::PrefixMatch { field, value } => {
            json!({ "match_phrase_prefix": { field.as_str(): { "query": value } } })
        }
        Predicate::ExactFilter { field, value } => json!({ "term": { field.as_str(): value } }),
        Predicate::RangeFilter { field, op, value } => {
            let op = match op {
                RangeOp::Gte => "gte",
                RangeOp::Lte => "lte",
            };
            let bound = match value {
                RangeValue::Int(v) => json!(v),
                RangeValue::Float(v) => json!(v),
                RangeValue::Date(v) => json!(v),
            };
            json!({ "range": { field.as_str(): { op: bound } } })
        }
        Predicate::And(children) => json!({
            "bool": { "must": children.iter().map(to_query_dsl).collect::<Vec<_>>() }
        }),
        Predicate::Or(children) => json!({
            "bool": {
                "should": children.iter().map(to_query_dsl).collect::<Vec<_>>(),
                "minimum_should_match": 1
            }
        }),
    }
}

/// Index mapping: analyzed text for title and description, keywords for facets.
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "title": { "type": "text" },
                "description": { "type": "text" },
                "category": { "type": "keyword" },
                "type": { "type": "keyword" },
                "gradeRange": { "type": "keyword" },
                "minAge": { "type": "integer" },
                "maxAge": { "type": "integer" },
                "price": { "type": "double" },
                "nextSessionDate": { "type": "date", "format": "strict_date_optional_time" }
            }
        }
    })
}

fn bulk_body(documents: &[CourseDocument]) -> Result<String, EngineError> {
    let mut body = String::new();
    for doc in documents {
        let action = json!({ "index": { "_id": doc.id } });
        let source =
            serde_json::to_string(doc).map_err(|e| EngineError::BadResponse(e.to_string()))?;
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}
