//! Wire shape consumed by graph renderers.
//!
//! Every graph element is wrapped as `{ "data": { ... } }`; top-level keys
//! are camelCase.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{
    ChunkRefView, CommunityEdge, CommunityNode, CommunitySubgraph, EntityEdge, EntityNode,
    GraphView, GroupNode, GroupView, LegendItem, SummaryView, ViewStats,
};

/// A renderer element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element<T> {
    pub data: T,
}

impl<T> From<T> for Element<T> {
    fn from(data: T) -> Self {
        Self { data }
    }
}

/// Level 0 element: meta-nodes are listed before meta-edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaElement {
    Node(Element<CommunityNode>),
    Edge(Element<CommunityEdge>),
}

/// Level 1 elements of one community.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityElements {
    pub entities: Vec<Element<EntityNode>>,
    pub edges: Vec<Element<EntityEdge>>,
    pub semantic_groups: Vec<Element<GroupNode>>,
}

impl From<CommunitySubgraph> for CommunityElements {
    fn from(sub: CommunitySubgraph) -> Self {
        Self {
            entities: sub.entities.into_iter().map(Element::from).collect(),
            edges: sub.edges.into_iter().map(Element::from).collect(),
            semantic_groups: sub.semantic_groups.into_iter().map(Element::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPayload {
    pub meta_elements: Vec<MetaElement>,
    pub community_data: BTreeMap<i64, CommunityElements>,
    pub chunk_texts: Vec<String>,
    pub chunk_refs: BTreeMap<String, Vec<ChunkRefView>>,
    pub comm_summaries: BTreeMap<i64, SummaryView>,
    pub semantic_groups: BTreeMap<String, GroupView>,
    pub legend: Vec<LegendItem>,
    pub stats: ViewStats,
}

impl From<GraphView> for GraphPayload {
    fn from(view: GraphView) -> Self {
        let meta_elements = view
            .meta
            .nodes
            .into_iter()
            .map(|n| MetaElement::Node(n.into()))
            .chain(view.meta.edges.into_iter().map(|e| MetaElement::Edge(e.into())))
            .collect();

        Self {
            meta_elements,
            community_data: view
                .communities
                .into_iter()
                .map(|(id, sub)| (id, CommunityElements::from(sub)))
                .collect(),
            chunk_texts: view.chunks.texts,
            chunk_refs: view.chunks.refs,
            comm_summaries: view.summaries,
            semantic_groups: view.semantic_groups,
            legend: view.legend,
            stats: view.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::pipeline::ViewPipeline;
    use kgview_core::VizConfig;

    fn mixed_payload() -> GraphPayload {
        ViewPipeline::build(&mixed(), &VizConfig::default())
            .unwrap()
            .into()
    }

    #[test]
    fn test_nodes_precede_edges() {
        let payload = mixed_payload();
        let kinds: Vec<bool> = payload
            .meta_elements
            .iter()
            .map(|e| matches!(e, MetaElement::Node(_)))
            .collect();
        assert_eq!(kinds, vec![true, true, true, false, false, false]);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(mixed_payload()).unwrap();

        for key in [
            "metaElements",
            "communityData",
            "chunkTexts",
            "chunkRefs",
            "commSummaries",
            "semanticGroups",
            "legend",
            "stats",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }

        let first = &json["metaElements"][0]["data"];
        assert_eq!(first["id"], "comm-0");
        assert_eq!(first["type"], "COMMUNITY");
        assert_eq!(first["member_count"], 3);

        let edge = &json["metaElements"][3]["data"];
        assert_eq!(edge["source"], "comm-0");
        assert_eq!(edge["weight"], 2);

        let entity = &json["communityData"]["0"]["entities"][0]["data"];
        assert_eq!(entity["parent"], "comm-0");
        assert_eq!(entity["type"], "CONCEPT");
        assert!(json["communityData"]["0"]["semantic_groups"].is_array());

        assert_eq!(json["commSummaries"]["1"]["title"], "Python ecosystem");
    }

    #[test]
    fn test_round_trips_through_json() {
        let payload = mixed_payload();
        let text = serde_json::to_string(&payload).unwrap();
        let back: GraphPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_empty_view_payload() {
        let payload = GraphPayload::from(GraphView::default());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["metaElements"], serde_json::json!([]));
        assert_eq!(json["communityData"], serde_json::json!({}));
        assert_eq!(json["chunkRefs"], serde_json::json!({}));
    }
}
