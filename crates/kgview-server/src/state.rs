//! Shared application state.

use std::sync::Arc;

use tracing::debug;

use kgview_core::{KgViewConfig, Result};
use kgview_engine::{GraphPayload, ViewPipeline};
use kgview_store::GraphStore;

use crate::cache::{ViewCache, ViewParams};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: KgViewConfig,
    pub cache: ViewCache,
}

impl AppState {
    pub fn new(config: KgViewConfig) -> Self {
        Self {
            config,
            cache: ViewCache::default_cache(),
        }
    }

    /// Open the graph store. Opened per request; the file may be replaced
    /// while the server runs.
    pub fn open_store(&self) -> Result<GraphStore> {
        GraphStore::open(&self.config.db_path)
    }

    /// Payload for `params`, served from cache while the store is unchanged.
    pub fn graph_payload(&self, params: ViewParams) -> Result<Arc<GraphPayload>> {
        let store = self.open_store()?;
        let freshness = store.freshness();

        if let Some(hit) = self.cache.get(freshness, &params) {
            debug!("Graph payload cache hit ({:?})", params);
            return Ok(hit);
        }

        let config = params.apply(&self.config.viz);
        let view = ViewPipeline::run(&store, &config)?;
        let payload = Arc::new(GraphPayload::from(view));
        self.cache.put(freshness, params, payload.clone());
        Ok(payload)
    }
}
