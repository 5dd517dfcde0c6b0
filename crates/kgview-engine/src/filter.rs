//! Optional pre-filter restricting a snapshot to its largest communities.

use std::collections::{BTreeMap, HashSet};

use tracing::info;

use kgview_store::GraphSnapshot;

use crate::connectivity::{RelationGraph, VisibleSet};

/// Keep the `n` communities with the most visible members (ties by
/// ascending id) and everything that hangs off them. Visibility is judged
/// on the unfiltered snapshot. `n == 0` returns the snapshot unchanged.
pub fn top_communities(
    snapshot: &GraphSnapshot,
    n: usize,
    include_isolated: bool,
) -> GraphSnapshot {
    if n == 0 {
        return snapshot.clone();
    }

    let graph = RelationGraph::build(&snapshot.entities, &snapshot.relationships);
    let visible = VisibleSet::select(&snapshot.entities, &graph, include_isolated);

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for community in visible
        .iter()
        .filter_map(|name| snapshot.entities.get(name).and_then(|e| e.community))
    {
        *counts.entry(community).or_default() += 1;
    }
    let mut ranked: Vec<(i64, usize)> = counts.into_iter().collect();
    // Stable sort over ascending ids keeps ties ordered by id.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let kept: HashSet<i64> = ranked.into_iter().take(n).map(|(id, _)| id).collect();

    let entities: BTreeMap<_, _> = snapshot
        .entities
        .iter()
        .filter(|(_, e)| e.community.is_some_and(|c| kept.contains(&c)))
        .map(|(name, e)| (name.clone(), e.clone()))
        .collect();

    let filtered = GraphSnapshot {
        relationships: snapshot
            .relationships
            .iter()
            .filter(|r| entities.contains_key(&r.source) && entities.contains_key(&r.target))
            .cloned()
            .collect(),
        summaries: snapshot
            .summaries
            .iter()
            .filter(|(id, _)| kept.contains(id))
            .map(|(id, s)| (*id, s.clone()))
            .collect(),
        chunks: snapshot.chunks.clone(),
        semantic_groups: snapshot
            .semantic_groups
            .iter()
            .filter(|g| g.members.iter().any(|m| entities.contains_key(m)))
            .cloned()
            .collect(),
        entity_chunks: snapshot
            .entity_chunks
            .iter()
            .filter(|(name, _)| entities.contains_key(*name))
            .map(|(name, refs)| (name.clone(), refs.clone()))
            .collect(),
        entities,
    };

    info!(
        "Top {} communities: kept {} of {} entities, {} of {} relationships",
        n,
        filtered.entities.len(),
        snapshot.entities.len(),
        filtered.relationships.len(),
        snapshot.relationships.len()
    );

    filtered
}
