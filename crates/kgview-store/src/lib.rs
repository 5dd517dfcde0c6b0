//! kgview store: read-only SQLite access to a persisted knowledge graph.
//!
//! Entities, relationships, communities, chunks and semantic groups are
//! produced by an upstream ingestion pipeline; this crate only reads them.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::GraphStore;
pub use types::*;
