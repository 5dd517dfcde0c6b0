//! kgview engine: three-level drill-down view of a knowledge graph.
//!
//! Level 0 is a meta-graph of communities, Level 1 the entities and edges
//! inside each community, Level 2 the source chunks behind each entity.
//! Every level is derived from the same visible-node set and community
//! buckets, so the levels never disagree about what is shown.

pub mod chunks;
pub mod community;
pub mod connectivity;
pub mod context;
pub mod filter;
pub mod legend;
pub mod meta;
pub mod payload;
pub mod pipeline;
pub mod sanitize;
pub mod scale;
pub mod subgraph;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use payload::GraphPayload;
pub use pipeline::ViewPipeline;
pub use types::*;
