//! Drives the level builders over one snapshot.

use tracing::info;

use kgview_core::{Result, VizConfig};
use kgview_store::{GraphSnapshot, GraphStore};

use crate::chunks::build_chunk_table;
use crate::context::ViewContext;
use crate::filter::top_communities;
use crate::legend::{build_legend, summarize_communities};
use crate::meta::build_meta_graph;
use crate::subgraph::{build_subgraphs, filter_semantic_groups};
use crate::types::{GraphView, ViewStats};

/// Snapshot → three-level view transformation.
pub struct ViewPipeline;

impl ViewPipeline {
    /// Load a snapshot from `store` and transform it.
    pub fn run(store: &GraphStore, config: &VizConfig) -> Result<GraphView> {
        config.validate()?;
        let snapshot = store.snapshot()?;
        Self::build(&snapshot, config)
    }

    /// Transform an already-loaded snapshot. Pure: the same input always
    /// yields the same view.
    pub fn build(snapshot: &GraphSnapshot, config: &VizConfig) -> Result<GraphView> {
        let start = std::time::Instant::now();
        config.validate()?;

        let filtered;
        let snapshot = if config.top_communities > 0 {
            filtered = top_communities(snapshot, config.top_communities, config.include_isolated);
            &filtered
        } else {
            snapshot
        };

        let ctx = ViewContext::new(snapshot, config);

        // Level 0
        let meta = build_meta_graph(&ctx);
        // Level 1
        let communities = build_subgraphs(&ctx);
        // Level 2
        let chunks = build_chunk_table(&ctx.visible, &snapshot.entity_chunks, &snapshot.chunks);

        let summaries = summarize_communities(&ctx);
        let semantic_groups =
            filter_semantic_groups(&snapshot.semantic_groups, &ctx.visible, config.max_compound_size);
        let legend = build_legend(&ctx);

        let stats = ViewStats {
            entities_loaded: snapshot.entities.len(),
            isolated_excluded: ctx.visible.isolated,
            unnamed_excluded: ctx.visible.unnamed,
            visible_entities: ctx.visible.len(),
            meta_nodes: meta.nodes.len(),
            meta_edges: meta.edges.len(),
            total_entities: communities.values().map(|c| c.entities.len()).sum(),
            intra_edges: communities.values().map(|c| c.edges.len()).sum(),
            nested_groups: communities.values().map(|c| c.semantic_groups.len()).sum(),
            entities_with_chunks: chunks.refs.len(),
            chunk_refs: chunks.refs.values().map(Vec::len).sum(),
            unique_chunk_texts: chunks.texts.len(),
            communities_included: ctx.buckets.retained_len(),
            communities_folded: ctx.buckets.other.communities,
            folded_entities: ctx.buckets.other.members,
        };

        info!(
            "Level 0: {} meta-nodes, {} meta-edges ({} communities included, {} folded into other)",
            stats.meta_nodes, stats.meta_edges, stats.communities_included, stats.communities_folded
        );
        info!(
            "Level 1: {} entities, {} intra-community edges, {} nested semantic groups",
            stats.total_entities, stats.intra_edges, stats.nested_groups
        );
        info!(
            "Level 2: {} entities with chunk refs, {} refs, {} unique texts",
            stats.entities_with_chunks, stats.chunk_refs, stats.unique_chunk_texts
        );
        info!("View built in {}ms", start.elapsed().as_millis());

        Ok(GraphView {
            meta,
            communities,
            chunks,
            summaries,
            semantic_groups,
            legend,
            stats,
        })
    }
}
