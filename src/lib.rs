//! Course Search Library
//!
//! Keyword, faceted and autocomplete search over a catalog of enrollable courses.
//! The binary (`main.rs`) wires these modules into an HTTP service.
//!
//! ## Modules
//! - **`search`**: The query-translation layer. Turns a loosely-typed request into an
//!   engine-neutral `QuerySpec`, runs course search and title suggestions, and exposes
//!   both over HTTP.
//! - **`engine`**: The `SearchEngine` abstraction plus two engines: an in-process one
//!   backed by a concurrent map, and a client for an Elasticsearch-compatible cluster.
//! - **`ingestion`**: Loads the course catalog from JSON into an engine at startup.
//! - **`config`**: Node settings from defaults, environment and command-line flags.

pub mod config;
pub mod engine;
pub mod ingestion;
pub mod search;
