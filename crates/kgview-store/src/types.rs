//! Record types for entities, relationships, communities and chunks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An entity row. Numeric measures are precomputed upstream and may be NULL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagerank: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_centrality: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betweenness: Option<f64>,
    /// Detected community; `None` when unassigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_refs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_sources: Option<i64>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// PageRank, 0 when missing.
    pub fn pagerank(&self) -> f64 {
        self.pagerank.unwrap_or(0.0)
    }

    /// Degree centrality, 0 when missing.
    pub fn degree_centrality(&self) -> f64 {
        self.degree_centrality.unwrap_or(0.0)
    }

    /// Betweenness, 0 when missing.
    pub fn betweenness(&self) -> f64 {
        self.betweenness.unwrap_or(0.0)
    }

    /// Entity type, `UNKNOWN` when missing.
    pub fn type_tag(&self) -> &str {
        self.entity_type.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Serialized source references, `[]` when missing.
    pub fn source_refs(&self) -> &str {
        self.source_refs.as_deref().unwrap_or("[]")
    }

    /// Number of sources, 1 when missing.
    pub fn num_sources(&self) -> i64 {
        self.num_sources.unwrap_or(1)
    }
}

/// A directed relationship between two entity names. Not deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Relationship {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            description: None,
            weight: None,
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Edge weight, 1.0 when missing.
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

/// LLM-written summary of one detected community.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunitySummary {
    pub community_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_entities: Vec<String>,
    #[serde(default)]
    pub key_insights: Vec<String>,
}

impl CommunitySummary {
    /// Title, or `Community {id}` when the summary has none.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("Community {}", self.community_id),
        }
    }

    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }
}

/// A unit of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: i64,
    pub text: String,
    pub source_id: String,
}

/// Entities judged equivalent or near-equivalent by the ingestion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticGroup {
    pub group_id: String,
    pub canonical: String,
    pub members: Vec<String>,
    /// Opaque pairwise similarity data, passed through untouched.
    #[serde(default)]
    pub member_similarities: BTreeMap<String, serde_json::Value>,
}

/// Reference from an entity to a chunk it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRef {
    pub chunk_index: i64,
    pub source_id: String,
}

/// A consistent, fully-loaded read of every collection the view consumes.
///
/// Optional collections that are absent from the store are simply empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub entities: BTreeMap<String, Entity>,
    pub relationships: Vec<Relationship>,
    pub summaries: BTreeMap<i64, CommunitySummary>,
    pub chunks: BTreeMap<i64, Chunk>,
    pub semantic_groups: Vec<SemanticGroup>,
    pub entity_chunks: BTreeMap<String, Vec<ChunkRef>>,
}

impl GraphSnapshot {
    /// Insert or replace an entity, keyed by its name.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.name.clone(), entity);
    }
}

/// Modification marker of the backing store, in milliseconds since the epoch.
///
/// Zero means the marker could not be determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Freshness(pub i64);

impl Freshness {
    pub fn is_known(&self) -> bool {
        self.0 != 0
    }
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub entities: i64,
    pub relationships: i64,
    pub community_summaries: i64,
    pub chunks: i64,
    pub semantic_groups: i64,
    pub entity_chunk_refs: i64,
    pub db_path: String,
    pub db_size_mb: f64,
    pub freshness: Freshness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}
