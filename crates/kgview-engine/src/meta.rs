//! Level 0: community meta-nodes and aggregated inter-community edges.

use std::collections::HashMap;

use kgview_store::Entity;

use crate::community::{community_meta_id, OTHER_COMMUNITY_ID, OTHER_META_ID};
use crate::context::ViewContext;
use crate::sanitize::truncate_chars;
use crate::scale::{round_to, LinearScale};
use crate::types::{CommunityEdge, CommunityNode, MetaGraph, COMMUNITY_NODE_TYPE};

/// Build the meta-graph: one node per qualifying community, one for the
/// folded bucket if anything was folded, and one edge per ordered pair of
/// meta-nodes that entity relationships cross between.
pub fn build_meta_graph(ctx: &ViewContext<'_>) -> MetaGraph {
    let mut nodes = community_nodes(ctx);
    if ctx.buckets.has_other() {
        nodes.push(other_node(ctx));
    }

    MetaGraph {
        nodes,
        edges: cross_community_edges(ctx),
    }
}

fn community_nodes(ctx: &ViewContext<'_>) -> Vec<CommunityNode> {
    let config = ctx.config;
    let entities = &ctx.snapshot.entities;
    let size_scale = LinearScale::new(ctx.buckets.qualifying_counts(), config.community_size);

    ctx.buckets
        .retained_ids()
        .map(|id| {
            let title = ctx
                .snapshot
                .summaries
                .get(&id)
                .map(|s| s.display_title())
                .unwrap_or_else(|| format!("Community {}", id));
            let member_count = ctx.buckets.members(id).len();

            let top: Vec<&str> = ctx
                .buckets
                .ranked_members(id, entities)
                .into_iter()
                .take(config.top_members)
                .collect();
            // Deliberately the top members only, not the whole community.
            let pagerank_sum: f64 = top
                .iter()
                .map(|name| entities.get(*name).map(Entity::pagerank).unwrap_or(0.0))
                .sum();

            CommunityNode {
                id: community_meta_id(id),
                label: truncate_chars(&title, config.title_len),
                node_type: COMMUNITY_NODE_TYPE.to_string(),
                community: id,
                member_count,
                top_members: top
                    .iter()
                    .map(|name| truncate_chars(name, config.member_name_len))
                    .collect(),
                color: config.color_for(id).to_string(),
                size: size_scale.scale(member_count as f64),
                pagerank_sum: round_to(pagerank_sum, 4),
            }
        })
        .collect()
}

fn other_node(ctx: &ViewContext<'_>) -> CommunityNode {
    let other = &ctx.buckets.other;
    CommunityNode {
        id: OTHER_META_ID.to_string(),
        label: format!("Other ({} small)", other.communities),
        node_type: COMMUNITY_NODE_TYPE.to_string(),
        community: OTHER_COMMUNITY_ID,
        member_count: other.members,
        top_members: Vec::new(),
        color: ctx.config.other_color.clone(),
        size: ctx.config.other_size,
        pagerank_sum: 0.0,
    }
}

struct EdgeAccumulator {
    source: String,
    target: String,
    count: usize,
    details: Vec<String>,
}

fn cross_community_edges(ctx: &ViewContext<'_>) -> Vec<CommunityEdge> {
    let config = ctx.config;
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut accumulated: Vec<EdgeAccumulator> = Vec::new();

    for rel in &ctx.snapshot.relationships {
        if !ctx.visible.contains(&rel.source) || !ctx.visible.contains(&rel.target) {
            continue;
        }
        let source_comm = ctx.community_of(&rel.source);
        let target_comm = ctx.community_of(&rel.target);
        if source_comm == target_comm {
            continue;
        }
        let source_shown = source_comm.is_some_and(|c| ctx.buckets.is_retained(c));
        let target_shown = target_comm.is_some_and(|c| ctx.buckets.is_retained(c));
        if !source_shown && !target_shown {
            continue;
        }

        let key = (
            ctx.buckets.meta_id_for(source_comm),
            ctx.buckets.meta_id_for(target_comm),
        );
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                accumulated.push(EdgeAccumulator {
                    source: key.0.clone(),
                    target: key.1.clone(),
                    count: 0,
                    details: Vec::new(),
                });
                index.insert(key, accumulated.len() - 1);
                accumulated.len() - 1
            }
        };

        let edge = &mut accumulated[slot];
        edge.count += 1;
        let description = rel.description();
        if !description.is_empty() && edge.details.len() < config.max_edge_samples {
            edge.details.push(format!(
                "{} \u{2192} {}: {}",
                rel.source,
                rel.target,
                truncate_chars(description, config.edge_description_len)
            ));
        }
    }

    accumulated
        .into_iter()
        .map(|edge| CommunityEdge {
            id: format!("{}-->{}", edge.source, edge.target),
            description: format!("{} cross-community relationships", edge.count),
            weight: edge.count,
            source: edge.source,
            target: edge.target,
            details: edge.details,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use kgview_core::VizConfig;

    #[test]
    fn test_scenario_single_community() {
        let snap = scenario_a();
        let config = VizConfig::default();
        let ctx = ViewContext::new(&snap, &config);
        let meta = build_meta_graph(&ctx);

        assert_eq!(meta.nodes.len(), 1);
        let node = &meta.nodes[0];
        assert_eq!(node.id, "comm-0");
        assert_eq!(node.member_count, 2);
        assert_eq!(node.top_members, vec!["B", "A"]);
        assert_eq!(node.pagerank_sum, 1.3);
        assert_eq!(node.color, "#e6194b");
        // Single qualifying community: degenerate domain.
        assert_eq!(node.size, 80);
        assert!(meta.edges.is_empty());
    }

    #[test]
    fn test_mixed_nodes() {
        let snap = mixed();
        let config = VizConfig::default();
        let ctx = ViewContext::new(&snap, &config);
        let meta = build_meta_graph(&ctx);

        let ids: Vec<&str> = meta.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["comm-0", "comm-1", "comm-other"]);

        assert_eq!(meta.nodes[0].label, "Rust toolchain");
        assert_eq!(meta.nodes[0].size, 120);
        assert_eq!(meta.nodes[0].pagerank_sum, 0.6);
        assert_eq!(meta.nodes[1].size, 40);
        assert_eq!(meta.nodes[1].color, "#3cb44b");

        let other = &meta.nodes[2];
        assert_eq!(other.label, "Other (2 small)");
        assert_eq!(other.member_count, 2);
        assert_eq!(other.community, -1);
        assert_eq!(other.size, 40);
        assert_eq!(other.color, "#555555");
        assert!(other.top_members.is_empty());
    }

    #[test]
    fn test_mixed_edges() {
        let snap = mixed();
        let config = VizConfig::default();
        let ctx = ViewContext::new(&snap, &config);
        let meta = build_meta_graph(&ctx);

        let edges: Vec<(&str, usize)> = meta
            .edges
            .iter()
            .map(|e| (e.id.as_str(), e.weight))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("comm-0-->comm-1", 2),
                ("comm-other-->comm-0", 1),
                ("comm-other-->comm-1", 1),
            ]
        );
        assert_eq!(meta.edges[0].description, "2 cross-community relationships");
        assert_eq!(
            meta.edges[0].details,
            vec![
                "Rust \u{2192} Python: Rust extensions for Python",
                "Cargo \u{2192} Python: Cargo builds Python wheels",
            ]
        );
    }

    #[test]
    fn test_edge_samples_capped_and_truncated() {
        let mut entities = vec![entity("Hub", Some(1), 0.5), entity("Peer", Some(1), 0.1)];
        let mut rels = vec![rel("Hub", "Peer", "inside")];
        for i in 0..8 {
            let name = format!("Spoke{}", i);
            entities.push(entity(&name, Some(0), 0.1));
            rels.push(rel(&name, "Hub", &"x".repeat(120)));
        }
        let snap = snapshot(
            entities,
            rels,
            vec![summary(0, "Spokes"), summary(1, "Hub")],
        );
        let config = VizConfig::default();
        let ctx = ViewContext::new(&snap, &config);
        let meta = build_meta_graph(&ctx);

        assert_eq!(meta.edges.len(), 1);
        let edge = &meta.edges[0];
        assert_eq!(edge.weight, 8);
        assert_eq!(edge.details.len(), 5);
        assert_eq!(edge.details[0], format!("Spoke0 \u{2192} Hub: {}", "x".repeat(80)));
    }

    #[test]
    fn test_top_members_limited_and_truncated() {
        let mut entities = Vec::new();
        let mut rels = Vec::new();
        for i in 0..7 {
            let name = format!("{}-a-very-long-entity-name-indeed", i);
            entities.push(entity(&name, Some(3), 0.1 * (i + 1) as f64));
            if i > 0 {
                rels.push(rel(&name, &entities[0].name.clone(), "link"));
            }
        }
        let snap = snapshot(entities, rels, vec![summary(3, &"T".repeat(50))]);
        let config = VizConfig::default();
        let ctx = ViewContext::new(&snap, &config);
        let meta = build_meta_graph(&ctx);

        let node = &meta.nodes[0];
        assert_eq!(node.label.chars().count(), 35);
        assert_eq!(node.member_count, 7);
        assert_eq!(node.top_members.len(), 5);
        assert_eq!(node.top_members[0], "6-a-very-long-entity-name");
        // 0.7 + 0.6 + 0.5 + 0.4 + 0.3
        assert_eq!(node.pagerank_sum, 2.5);
    }

    #[test]
    fn test_no_qualifying_communities() {
        let snap = snapshot(
            vec![entity("A", Some(0), 0.1), entity("B", Some(1), 0.2)],
            vec![rel("A", "B", "ab")],
            vec![summary(0, "zero"), summary(1, "one")],
        );
        let config = VizConfig::default();
        let ctx = ViewContext::new(&snap, &config);
        let meta = build_meta_graph(&ctx);

        assert_eq!(meta.nodes.len(), 1);
        assert_eq!(meta.nodes[0].id, "comm-other");
        assert_eq!(meta.nodes[0].label, "Other (2 small)");
        assert!(meta.edges.is_empty());
    }
}
