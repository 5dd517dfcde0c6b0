//! Filtered state shared by every output level.

use kgview_core::VizConfig;
use kgview_store::GraphSnapshot;

use crate::community::CommunityBuckets;
use crate::connectivity::{RelationGraph, VisibleSet};

/// Visible nodes and community buckets of one snapshot. Each level builder
/// reads from it independently; nothing here is mutated after construction.
pub struct ViewContext<'a> {
    pub snapshot: &'a GraphSnapshot,
    pub config: &'a VizConfig,
    pub visible: VisibleSet,
    pub buckets: CommunityBuckets,
}

impl<'a> ViewContext<'a> {
    pub fn new(snapshot: &'a GraphSnapshot, config: &'a VizConfig) -> Self {
        let graph = RelationGraph::build(&snapshot.entities, &snapshot.relationships);
        let visible = VisibleSet::select(&snapshot.entities, &graph, config.include_isolated);
        let buckets = CommunityBuckets::aggregate(
            &visible,
            &snapshot.entities,
            &snapshot.summaries,
            config.min_community_size,
        );

        Self {
            snapshot,
            config,
            visible,
            buckets,
        }
    }

    /// Raw community of an entity, `None` when unassigned or unknown.
    pub fn community_of(&self, name: &str) -> Option<i64> {
        self.snapshot.entities.get(name).and_then(|e| e.community)
    }
}
