//! Level 1: per-community entity nodes, intra-community edges and nested
//! semantic group containers.

use std::collections::{BTreeMap, HashMap, HashSet};

use kgview_store::{Entity, SemanticGroup};

use crate::community::community_meta_id;
use crate::connectivity::VisibleSet;
use crate::context::ViewContext;
use crate::sanitize::sanitize_id;
use crate::scale::{round_to, LinearScale};
use crate::types::{
    CommunitySubgraph, EntityEdge, EntityNode, GroupNode, GroupView, SEMANTIC_GROUP_NODE_TYPE,
};

/// Container id of a semantic group.
pub fn group_container_id(group_id: &str) -> String {
    format!("sg-{}", group_id)
}

/// Build the expanded view of every qualifying community.
pub fn build_subgraphs(ctx: &ViewContext<'_>) -> BTreeMap<i64, CommunitySubgraph> {
    // Entity sizes are scaled against every visible node, not per community.
    let size_scale = LinearScale::new(
        ctx.visible
            .iter()
            .map(|name| ctx.snapshot.entities.get(name).map(Entity::pagerank).unwrap_or(0.0)),
        ctx.config.entity_size,
    );

    ctx.buckets
        .retained_ids()
        .map(|id| (id, build_subgraph(ctx, id, &size_scale)))
        .collect()
}

fn build_subgraph(ctx: &ViewContext<'_>, community_id: i64, size_scale: &LinearScale) -> CommunitySubgraph {
    let config = ctx.config;
    let members = ctx.buckets.members(community_id);
    let member_set: HashSet<&str> = members.iter().map(String::as_str).collect();
    let parent = community_meta_id(community_id);
    let color = config.color_for(community_id).to_string();

    let mut entities: Vec<EntityNode> = members
        .iter()
        .filter_map(|name| ctx.snapshot.entities.get(name))
        .map(|entity| {
            let pagerank = entity.pagerank();
            EntityNode {
                id: sanitize_id(&entity.name),
                label: entity.name.clone(),
                parent: parent.clone(),
                entity_type: entity.type_tag().to_string(),
                description: entity.description().to_string(),
                community: community_id,
                pagerank: round_to(pagerank, 6),
                degree_centrality: round_to(entity.degree_centrality(), 4),
                betweenness: round_to(entity.betweenness(), 4),
                num_sources: entity.num_sources(),
                source_refs: entity.source_refs().to_string(),
                color: color.clone(),
                size: size_scale.scale(pagerank),
                chunk_count: ctx
                    .snapshot
                    .entity_chunks
                    .get(&entity.name)
                    .map(Vec::len)
                    .unwrap_or(0),
            }
        })
        .collect();

    let edges = ctx
        .snapshot
        .relationships
        .iter()
        .filter(|rel| {
            member_set.contains(rel.source.as_str()) && member_set.contains(rel.target.as_str())
        })
        .map(|rel| {
            let source = sanitize_id(&rel.source);
            let target = sanitize_id(&rel.target);
            EntityEdge {
                id: sanitize_id(&format!("{}-->{}", rel.source, rel.target)),
                source,
                target,
                description: rel.description().to_string(),
                weight: rel.weight(),
            }
        })
        .collect();

    let mut semantic_groups = Vec::new();
    let mut reparent: HashMap<String, String> = HashMap::new();
    for group in &ctx.snapshot.semantic_groups {
        if group.members.len() > config.max_compound_size {
            continue;
        }
        let valid: Vec<&String> = group
            .members
            .iter()
            .filter(|m| member_set.contains(m.as_str()) && ctx.visible.contains(m))
            .collect();
        if valid.len() < 2 {
            continue;
        }

        let container = group_container_id(&group.group_id);
        semantic_groups.push(GroupNode {
            id: container.clone(),
            label: group.canonical.clone(),
            parent: parent.clone(),
            node_type: SEMANTIC_GROUP_NODE_TYPE.to_string(),
            group_id: group.group_id.clone(),
            canonical: group.canonical.clone(),
            member_count: valid.len(),
            color: config.semantic_group_color.clone(),
        });
        // A later group claims an entity listed in an earlier one.
        for member in valid {
            reparent.insert(sanitize_id(member), container.clone());
        }
    }

    for node in &mut entities {
        if let Some(container) = reparent.get(&node.id) {
            node.parent = container.clone();
        }
    }

    CommunitySubgraph {
        entities,
        edges,
        semantic_groups,
    }
}

/// Semantic groups within the size cap that keep at least two visible
/// members, keyed by group id.
pub fn filter_semantic_groups(
    groups: &[SemanticGroup],
    visible: &VisibleSet,
    max_compound_size: usize,
) -> BTreeMap<String, GroupView> {
    groups
        .iter()
        .filter(|group| group.members.len() <= max_compound_size)
        .filter_map(|group| {
            let members: Vec<String> = group
                .members
                .iter()
                .filter(|m| visible.contains(m))
                .cloned()
                .collect();
            (members.len() >= 2).then(|| {
                (
                    group.group_id.clone(),
                    GroupView {
                        canonical: group.canonical.clone(),
                        members,
                        member_similarities: group.member_similarities.clone(),
                    },
                )
            })
        })
        .collect()
}
