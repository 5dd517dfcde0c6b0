//! Relationship degree and visible-node selection.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::info;

use kgview_store::{Entity, Relationship};

/// Directed multigraph over entity names, one edge per relationship row.
pub struct RelationGraph {
    graph: DiGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
}

impl RelationGraph {
    /// Build from the entity map and every relationship. Relationship
    /// endpoints missing from the entity map still get a node so their
    /// degree is counted, but they never become visible.
    pub fn build(entities: &BTreeMap<String, Entity>, relationships: &[Relationship]) -> Self {
        let mut graph = DiGraph::with_capacity(entities.len(), relationships.len());
        let mut node_index = HashMap::with_capacity(entities.len());

        for name in entities.keys() {
            let idx = graph.add_node(name.clone());
            node_index.insert(name.clone(), idx);
        }

        for rel in relationships {
            let source = Self::ensure_node(&mut graph, &mut node_index, &rel.source);
            let target = Self::ensure_node(&mut graph, &mut node_index, &rel.target);
            graph.add_edge(source, target, ());
        }

        Self { graph, node_index }
    }

    fn ensure_node(
        graph: &mut DiGraph<String, ()>,
        node_index: &mut HashMap<String, NodeIndex>,
        name: &str,
    ) -> NodeIndex {
        if let Some(idx) = node_index.get(name) {
            return *idx;
        }
        let idx = graph.add_node(name.to_string());
        node_index.insert(name.to_string(), idx);
        idx
    }

    /// Appearances as source or target. A self-loop counts twice.
    pub fn degree(&self, name: &str) -> usize {
        match self.node_index.get(name) {
            Some(&idx) => {
                self.graph.edges_directed(idx, Direction::Outgoing).count()
                    + self.graph.edges_directed(idx, Direction::Incoming).count()
            }
            None => 0,
        }
    }
}

/// Entities eligible for any output level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet {
    nodes: BTreeSet<String>,
    /// Named entities left out for having no relationship.
    pub isolated: usize,
    /// Entities left out for a blank name.
    pub unnamed: usize,
}

impl VisibleSet {
    /// Select entities with a non-blank name and, unless `include_isolated`
    /// is set, at least one relationship.
    pub fn select(
        entities: &BTreeMap<String, Entity>,
        graph: &RelationGraph,
        include_isolated: bool,
    ) -> Self {
        let mut nodes = BTreeSet::new();
        let mut isolated = 0;
        let mut unnamed = 0;
        for name in entities.keys() {
            if name.trim().is_empty() {
                unnamed += 1;
            } else if include_isolated || graph.degree(name) > 0 {
                nodes.insert(name.clone());
            } else {
                isolated += 1;
            }
        }

        info!(
            "Visualization filter: {} connected nodes (filtered out {} isolated and {} unnamed nodes, kept in DB)",
            nodes.len(),
            isolated,
            unnamed
        );

        Self {
            nodes,
            isolated,
            unnamed,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// Visible names in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
