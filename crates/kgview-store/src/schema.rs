//! Database schema SQL of the knowledge graph written by the ingestion pipeline.
//!
//! kgview never executes this against a live store; it documents the tables
//! the loaders read and lets tests build fixture databases.

/// Required tables: entities and relationships.
pub const CORE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS entities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    type TEXT,
    description TEXT,
    pagerank REAL,
    degree_centrality REAL,
    betweenness REAL,
    community_id INTEGER,
    source_refs TEXT,
    num_sources INTEGER
);

CREATE TABLE IF NOT EXISTS relationships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id INTEGER NOT NULL REFERENCES entities(id),
    target_id INTEGER NOT NULL REFERENCES entities(id),
    description TEXT,
    weight REAL
);

CREATE INDEX IF NOT EXISTS idx_entities_community ON entities(community_id);
"#;

/// Optional tables. Any of them may be missing from an older store.
pub const OPTIONAL_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS community_summaries (
    community_id INTEGER PRIMARY KEY,
    title TEXT,
    summary TEXT,
    key_entities TEXT,
    key_insights TEXT
);

CREATE TABLE IF NOT EXISTS chunks (
    chunk_index INTEGER PRIMARY KEY,
    content TEXT NOT NULL,
    source_ref TEXT
);

CREATE TABLE IF NOT EXISTS semantic_groups (
    group_id TEXT PRIMARY KEY,
    canonical TEXT NOT NULL,
    members TEXT,
    member_similarities TEXT
);

CREATE TABLE IF NOT EXISTS entity_chunk_map (
    entity_name TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    source_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_entity_chunk_map_name ON entity_chunk_map(entity_name);
"#;

/// Optional tables, in the order the loaders read them.
pub const OPTIONAL_TABLES: [&str; 4] = [
    "community_summaries",
    "chunks",
    "semantic_groups",
    "entity_chunk_map",
];

/// Full schema: core plus optional tables.
pub fn full_schema() -> String {
    format!("{}\n{}", CORE_SCHEMA_SQL, OPTIONAL_SCHEMA_SQL)
}
