//! View model types for the three drill-down levels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node type tag of community meta-nodes.
pub const COMMUNITY_NODE_TYPE: &str = "COMMUNITY";
/// Node type tag of semantic group containers.
pub const SEMANTIC_GROUP_NODE_TYPE: &str = "SEMANTIC_GROUP";

// ---------------------------------------------------------------
// Level 0
// ---------------------------------------------------------------

/// A qualifying community (or the folded "other" bucket) drawn as one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub community: i64,
    pub member_count: usize,
    pub top_members: Vec<String>,
    pub color: String,
    pub size: i64,
    /// PageRank summed over `top_members` only, not the whole community.
    pub pagerank_sum: f64,
}

/// Relationships between two meta-nodes, aggregated into one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Number of entity-level relationships aggregated.
    pub weight: usize,
    pub description: String,
    /// Up to a fixed number of `"{source} → {target}: {description}"` samples.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaGraph {
    pub nodes: Vec<CommunityNode>,
    pub edges: Vec<CommunityEdge>,
}

// ---------------------------------------------------------------
// Level 1
// ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub id: String,
    pub label: String,
    /// Community meta id, or the semantic group container that nests it.
    pub parent: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub description: String,
    pub community: i64,
    pub pagerank: f64,
    pub degree_centrality: f64,
    pub betweenness: f64,
    pub num_sources: i64,
    pub source_refs: String,
    pub color: String,
    pub size: i64,
    pub chunk_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub description: String,
    pub weight: f64,
}

/// Compound container for a semantic group inside one community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: String,
    pub label: String,
    pub parent: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub group_id: String,
    pub canonical: String,
    pub member_count: usize,
    pub color: String,
}

/// Everything shown when one community is expanded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunitySubgraph {
    pub entities: Vec<EntityNode>,
    pub edges: Vec<EntityEdge>,
    pub semantic_groups: Vec<GroupNode>,
}

// ---------------------------------------------------------------
// Level 2
// ---------------------------------------------------------------

/// One entity → chunk reference, pointing into the shared text table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRefView {
    /// Original chunk index in the store.
    pub index: i64,
    pub source_id: String,
    /// Slot in [`ChunkTable::texts`].
    pub text_idx: usize,
}

/// Deduplicated chunk texts plus per-entity references into them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkTable {
    pub texts: Vec<String>,
    /// Sanitized entity id → references, never empty.
    pub refs: BTreeMap<String, Vec<ChunkRefView>>,
}

// ---------------------------------------------------------------
// Summaries, groups, legend
// ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub title: String,
    pub summary: String,
    pub key_insights: Vec<String>,
}

/// A semantic group that survived the size cap and visibility filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub canonical: String,
    /// Visible members, in declared order.
    pub members: Vec<String>,
    pub member_similarities: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub id: i64,
    pub color: String,
    pub count: usize,
    pub members: Vec<String>,
    pub title: String,
}

/// Diagnostic counters of one transformation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewStats {
    pub entities_loaded: usize,
    pub isolated_excluded: usize,
    pub unnamed_excluded: usize,
    pub visible_entities: usize,
    pub meta_nodes: usize,
    pub meta_edges: usize,
    pub total_entities: usize,
    pub intra_edges: usize,
    pub nested_groups: usize,
    pub entities_with_chunks: usize,
    pub chunk_refs: usize,
    pub unique_chunk_texts: usize,
    pub communities_included: usize,
    pub communities_folded: usize,
    pub folded_entities: usize,
}

/// The complete three-level view of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub meta: MetaGraph,
    pub communities: BTreeMap<i64, CommunitySubgraph>,
    pub chunks: ChunkTable,
    pub summaries: BTreeMap<i64, SummaryView>,
    pub semantic_groups: BTreeMap<String, GroupView>,
    pub legend: Vec<LegendItem>,
    pub stats: ViewStats,
}
