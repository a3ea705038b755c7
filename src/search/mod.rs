//! Search Service Module
//!
//! The query-translation layer and the services built on top of it.
//!
//! ## Overview
//! A loosely-typed request (free text, numeric ranges, keyword filters, a date
//! floor, sort mode and pagination) is turned into an engine-neutral
//! [`query::QuerySpec`]. Execution, tokenization and ranking belong to the
//! engine the services are constructed with.
//!
//! ## Submodules
//! - **`builder`**: `SearchRequest` -> `QuerySpec` translation and sort selection.
//! - **`query`**: The predicate tree, sort and pagination types.
//! - **`service`**: Runs a built query and projects hits into `CourseSummary` values.
//! - **`suggest`**: Title autocomplete with first-seen deduplication.
//! - **`handlers`**: Axum handlers, parameter coercion and validation.
//! - **`error`**: Error taxonomy and its HTTP mapping.
//! - **`types`**: Request, document and response DTOs.

pub mod builder;
pub mod error;
pub mod handlers;
pub mod query;
pub mod service;
pub mod suggest;
pub mod types;
