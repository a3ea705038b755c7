//! Ingestion Module
//!
//! Seeds the search engine with the course catalog at startup.
//!
//! ## Workflow
//! 1. **Read**: Parses a JSON array of course documents from disk.
//! 2. **Normalise**: Assigns a UUID to any document without an id.
//! 3. **Reset**: Drops the engine's existing index so every start is clean.
//! 4. **Index**: Bulk-indexes the parsed documents.

pub mod loader;
