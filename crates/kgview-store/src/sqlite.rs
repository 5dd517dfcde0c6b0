//! Read-only SQLite loaders for the knowledge graph tables.
//!
//! The store is opened with `SQLITE_OPEN_READ_ONLY`; kgview never writes back.
//! A snapshot reads every table inside one transaction so the entity ids the
//! relationships reference and the rows they resolve to come from the same
//! state of the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::schema::OPTIONAL_TABLES;
use crate::types::*;
use kgview_core::{Error, Result};

/// Read-only handle on a knowledge graph database.
pub struct GraphStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl GraphStore {
    /// Open an existing store. A missing or unreadable file is
    /// [`Error::SourceUnavailable`].
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if !db_path.is_file() {
            return Err(Error::SourceUnavailable(format!(
                "Database not found: {}",
                db_path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::SourceUnavailable(e.to_string()))?;

        debug!("GraphStore opened read-only: {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Current modification marker of the backing file.
    pub fn freshness(&self) -> Freshness {
        freshness_of(&self.db_path)
    }

    /// Load every collection in one read transaction.
    ///
    /// Any loader failure aborts the whole snapshot; absent optional tables
    /// yield empty collections.
    pub fn snapshot(&self) -> Result<GraphSnapshot> {
        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction().map_err(db_err)?;

        let snapshot = GraphSnapshot {
            entities: load_entities(&tx)?,
            relationships: load_relationships(&tx)?,
            summaries: load_community_summaries(&tx)?,
            chunks: load_chunks(&tx)?,
            semantic_groups: load_semantic_groups(&tx)?,
            entity_chunks: load_entity_chunk_map(&tx)?,
        };
        drop(tx);

        info!(
            "Loaded {} entities, {} relationships, {} communities, {} chunks from {}",
            snapshot.entities.len(),
            snapshot.relationships.len(),
            snapshot.summaries.len(),
            snapshot.chunks.len(),
            self.db_path.display()
        );

        Ok(snapshot)
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    /// Row counts per table. Absent optional tables count as zero.
    pub fn get_stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let entities = count_rows(&conn, "entities")?;
        let relationships = count_rows(&conn, "relationships")?;

        let mut optional = [0i64; 4];
        for (slot, table) in optional.iter_mut().zip(OPTIONAL_TABLES) {
            if table_exists(&conn, table)? {
                *slot = count_rows(&conn, table)?;
            }
        }
        drop(conn);

        let db_size_mb = std::fs::metadata(&self.db_path)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);
        let freshness = self.freshness();
        let modified_at = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(freshness.0)
            .filter(|_| freshness.is_known())
            .map(|dt| dt.to_rfc3339());

        Ok(StoreStats {
            entities,
            relationships,
            community_summaries: optional[0],
            chunks: optional[1],
            semantic_groups: optional[2],
            entity_chunk_refs: optional[3],
            db_path: self.db_path.display().to_string(),
            db_size_mb: (db_size_mb * 100.0).round() / 100.0,
            freshness,
            modified_at,
        })
    }
}

/// Modification marker of a database file, including its WAL sidecar.
pub fn freshness_of(db_path: &Path) -> Freshness {
    let mut wal = db_path.as_os_str().to_owned();
    wal.push("-wal");

    [db_path.to_path_buf(), PathBuf::from(wal)]
        .iter()
        .filter_map(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok())
        .filter_map(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .max()
        .map(Freshness)
        .unwrap_or_default()
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Database(e.to_string())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let count: i64 = conn
        .prepare_cached("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
        .map_err(db_err)?
        .query_row(params![table], |row| row.get(0))
        .map_err(db_err)?;
    Ok(count > 0)
}

fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    conn.query_row(&sql, [], |row| row.get(0)).map_err(db_err)
}

/// Text form of a loosely-typed column (ids may be stored as text or integer).
fn value_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Parse a JSON-encoded column. NULL, blank and `null` are the empty value.
fn parse_json_column<T: DeserializeOwned + Default>(
    raw: Option<String>,
    table: &'static str,
    field: &'static str,
) -> Result<T> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str::<Option<T>>(text)
            .map(Option::unwrap_or_default)
            .map_err(|e| Error::MalformedRecord {
                table,
                field,
                reason: e.to_string(),
            }),
    }
}

fn load_entities(conn: &Connection) -> Result<BTreeMap<String, Entity>> {
    let mut stmt = conn
        .prepare(
            "SELECT name, type, description, pagerank, degree_centrality, \
             betweenness, community_id, source_refs, num_sources FROM entities",
        )
        .map_err(db_err)?;
    let rows = stmt
        .query_map([], |row| {
            let community: Option<i64> = row.get(6)?;
            Ok(Entity {
                name: row.get(0)?,
                entity_type: row.get(1)?,
                description: row.get(2)?,
                pagerank: row.get(3)?,
                degree_centrality: row.get(4)?,
                betweenness: row.get(5)?,
                // Negative ids are the ingestion pipeline's "unassigned" marker.
                community: community.filter(|c| *c >= 0),
                source_refs: row.get(7)?,
                num_sources: row.get(8)?,
            })
        })
        .map_err(db_err)?;

    let mut entities = BTreeMap::new();
    for row in rows {
        let entity = row.map_err(db_err)?;
        entities.insert(entity.name.clone(), entity);
    }
    Ok(entities)
}

fn load_relationships(conn: &Connection) -> Result<Vec<Relationship>> {
    let mut stmt = conn
        .prepare(
            "SELECT e1.name, e2.name, r.description, r.weight \
             FROM relationships r \
             JOIN entities e1 ON r.source_id = e1.id \
             JOIN entities e2 ON r.target_id = e2.id \
             ORDER BY r.rowid",
        )
        .map_err(db_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Relationship {
                source: row.get(0)?,
                target: row.get(1)?,
                description: row.get(2)?,
                weight: row.get(3)?,
            })
        })
        .map_err(db_err)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
}

fn load_community_summaries(conn: &Connection) -> Result<BTreeMap<i64, CommunitySummary>> {
    if !table_exists(conn, "community_summaries")? {
        debug!("community_summaries table absent, treating as empty");
        return Ok(BTreeMap::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT community_id, title, summary, key_entities, key_insights \
             FROM community_summaries",
        )
        .map_err(db_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })
        .map_err(db_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(db_err)?;

    let mut summaries = BTreeMap::new();
    for (community_id, title, summary, key_entities, key_insights) in rows {
        summaries.insert(
            community_id,
            CommunitySummary {
                community_id,
                title,
                summary,
                key_entities: parse_json_column(key_entities, "community_summaries", "key_entities")?,
                key_insights: parse_json_column(key_insights, "community_summaries", "key_insights")?,
            },
        );
    }
    Ok(summaries)
}

fn load_chunks(conn: &Connection) -> Result<BTreeMap<i64, Chunk>> {
    if !table_exists(conn, "chunks")? {
        debug!("chunks table absent, treating as empty");
        return Ok(BTreeMap::new());
    }

    let mut stmt = conn
        .prepare("SELECT chunk_index, content, source_ref FROM chunks")
        .map_err(db_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Chunk {
                index: row.get(0)?,
                text: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                source_id: value_text(row.get_ref(2)?),
            })
        })
        .map_err(db_err)?;

    let mut chunks = BTreeMap::new();
    for row in rows {
        let chunk = row.map_err(db_err)?;
        chunks.insert(chunk.index, chunk);
    }
    Ok(chunks)
}

fn load_semantic_groups(conn: &Connection) -> Result<Vec<SemanticGroup>> {
    if !table_exists(conn, "semantic_groups")? {
        debug!("semantic_groups table absent, treating as empty");
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT group_id, canonical, members, member_similarities \
             FROM semantic_groups ORDER BY rowid",
        )
        .map_err(db_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                value_text(row.get_ref(0)?),
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })
        .map_err(db_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(db_err)?;

    rows.into_iter()
        .map(|(group_id, canonical, members, similarities)| {
            Ok(SemanticGroup {
                group_id,
                canonical,
                members: parse_json_column(members, "semantic_groups", "members")?,
                member_similarities: parse_json_column(
                    similarities,
                    "semantic_groups",
                    "member_similarities",
                )?,
            })
        })
        .collect()
}

fn load_entity_chunk_map(conn: &Connection) -> Result<BTreeMap<String, Vec<ChunkRef>>> {
    if !table_exists(conn, "entity_chunk_map")? {
        debug!("entity_chunk_map table absent, treating as empty");
        return Ok(BTreeMap::new());
    }

    let mut stmt = conn
        .prepare("SELECT entity_name, chunk_index, source_id FROM entity_chunk_map ORDER BY rowid")
        .map_err(db_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ChunkRef {
                    chunk_index: row.get(1)?,
                    source_id: value_text(row.get_ref(2)?),
                },
            ))
        })
        .map_err(db_err)?;

    let mut map: BTreeMap<String, Vec<ChunkRef>> = BTreeMap::new();
    for row in rows {
        let (entity, chunk_ref) = row.map_err(db_err)?;
        map.entry(entity).or_default().push(chunk_ref);
    }
    Ok(map)
}
