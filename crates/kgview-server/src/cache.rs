//! Freshness-keyed cache of computed graph payloads.
//!
//! One entry per request parameter set. An entry is served only while the
//! store's freshness marker matches the one it was computed against;
//! otherwise it is recomputed and replaced.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use kgview_core::VizConfig;
use kgview_engine::GraphPayload;
use kgview_store::Freshness;

/// Request parameters that change the computed view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewParams {
    /// Restrict to the N largest communities; 0 disables the pre-filter.
    pub top_communities: usize,
}

impl ViewParams {
    /// View configuration for these parameters on top of `base`.
    pub fn apply(&self, base: &VizConfig) -> VizConfig {
        VizConfig {
            top_communities: self.top_communities,
            ..base.clone()
        }
    }
}

struct CacheEntry {
    freshness: Freshness,
    payload: Arc<GraphPayload>,
}

/// Thread-safe bounded payload cache.
pub struct ViewCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<ViewParams, CacheEntry>,
    order: Vec<ViewParams>,
    max_size: usize,
}

impl ViewCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
            }),
        }
    }

    /// Default cache: 16 parameter sets.
    pub fn default_cache() -> Self {
        Self::new(16)
    }

    /// Cached payload for `params`, if it was computed at `freshness`.
    /// A stale entry is dropped.
    pub fn get(&self, freshness: Freshness, params: &ViewParams) -> Option<Arc<GraphPayload>> {
        if !freshness.is_known() {
            return None;
        }
        let mut inner = self.inner.lock();

        let fresh = inner.entries.get(params).map(|e| e.freshness == freshness);
        match fresh {
            Some(true) => {
                if let Some(pos) = inner.order.iter().position(|k| k == params) {
                    let key = inner.order.remove(pos);
                    inner.order.push(key);
                }
                inner.entries.get(params).map(|e| e.payload.clone())
            }
            Some(false) => {
                inner.entries.remove(params);
                inner.order.retain(|k| k != params);
                None
            }
            None => None,
        }
    }

    /// Store a payload computed at `freshness`. Unknown freshness is never
    /// cached.
    pub fn put(&self, freshness: Freshness, params: ViewParams, payload: Arc<GraphPayload>) {
        if !freshness.is_known() {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.max_size == 0 {
            return;
        }

        if inner.entries.contains_key(&params) {
            inner.order.retain(|k| k != &params);
        } else {
            while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
                let oldest = inner.order.remove(0);
                inner.entries.remove(&oldest);
            }
        }

        inner.order.push(params);
        inner.entries.insert(params, CacheEntry { freshness, payload });
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
