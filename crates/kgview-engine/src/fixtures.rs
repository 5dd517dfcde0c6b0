//! Snapshot builders shared by the unit tests.

use kgview_store::{
    Chunk, ChunkRef, CommunitySummary, Entity, GraphSnapshot, Relationship, SemanticGroup,
};

pub fn entity(name: &str, community: Option<i64>, pagerank: f64) -> Entity {
    Entity {
        entity_type: Some("CONCEPT".to_string()),
        description: Some(format!("about {}", name)),
        community,
        pagerank: Some(pagerank),
        ..Entity::new(name)
    }
}

pub fn rel(source: &str, target: &str, description: &str) -> Relationship {
    Relationship {
        description: Some(description.to_string()),
        ..Relationship::new(source, target)
    }
}

pub fn summary(id: i64, title: &str) -> CommunitySummary {
    CommunitySummary {
        community_id: id,
        title: Some(title.to_string()),
        summary: Some(format!("summary of {}", title)),
        key_entities: Vec::new(),
        key_insights: vec![format!("insight about {}", title)],
    }
}

pub fn group(id: &str, canonical: &str, members: &[&str]) -> SemanticGroup {
    SemanticGroup {
        group_id: id.to_string(),
        canonical: canonical.to_string(),
        members: members.iter().map(|m| m.to_string()).collect(),
        ..Default::default()
    }
}

pub fn chunk(index: i64, text: &str) -> Chunk {
    Chunk {
        index,
        text: text.to_string(),
        source_id: format!("src-{}", index),
    }
}

pub fn chunk_ref(index: i64) -> ChunkRef {
    ChunkRef {
        chunk_index: index,
        source_id: format!("src-{}", index),
    }
}

pub fn snapshot(
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    summaries: Vec<CommunitySummary>,
) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot {
        relationships,
        summaries: summaries.into_iter().map(|s| (s.community_id, s)).collect(),
        ..Default::default()
    };
    for e in entities {
        snapshot.add_entity(e);
    }
    snapshot
}

/// A(0.5) and B(0.8) in community 0, linked once.
pub fn scenario_a() -> GraphSnapshot {
    snapshot(
        vec![entity("A", Some(0), 0.5), entity("B", Some(0), 0.8)],
        vec![rel("A", "B", "A relates to B")],
        vec![summary(0, "Letters")],
    )
}

/// Two qualifying communities, one singleton community, one unassigned
/// entity and one isolated entity.
pub fn mixed() -> GraphSnapshot {
    snapshot(
        vec![
            entity("Rust", Some(0), 0.30),
            entity("Cargo", Some(0), 0.20),
            entity("rustc", Some(0), 0.10),
            entity("Python", Some(1), 0.25),
            entity("pip", Some(1), 0.05),
            entity("Haskell", Some(2), 0.15),
            entity("Stray", None, 0.01),
            entity("Lonely", Some(0), 0.99),
        ],
        vec![
            rel("Rust", "Cargo", "Rust ships with Cargo"),
            rel("rustc", "Rust", "rustc compiles Rust"),
            rel("Python", "pip", "pip installs Python packages"),
            rel("Rust", "Python", "Rust extensions for Python"),
            rel("Cargo", "Python", "Cargo builds Python wheels"),
            rel("Haskell", "Rust", "Haskell influenced Rust"),
            rel("Stray", "Haskell", ""),
            rel("Stray", "Python", "stray link"),
        ],
        vec![
            summary(0, "Rust toolchain"),
            summary(1, "Python ecosystem"),
            summary(2, "Haskell"),
        ],
    )
}
