//! Level 2: globally deduplicated chunk texts and per-entity references.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use kgview_store::{Chunk, ChunkRef};

use crate::connectivity::VisibleSet;
use crate::sanitize::sanitize_id;
use crate::types::{ChunkRefView, ChunkTable};

/// Append-only text table; identical texts share one slot.
#[derive(Debug, Default)]
struct TextInterner {
    texts: Vec<String>,
    slots: HashMap<String, usize>,
}

impl TextInterner {
    fn intern(&mut self, text: &str) -> usize {
        if let Some(&slot) = self.slots.get(text) {
            return slot;
        }
        let slot = self.texts.len();
        self.texts.push(text.to_string());
        self.slots.insert(text.to_string(), slot);
        slot
    }
}

/// Resolve every visible entity's chunk references against the chunk table.
///
/// References to unknown chunk indices are skipped; an entity left with no
/// resolvable reference is omitted from the result.
pub fn build_chunk_table(
    visible: &VisibleSet,
    entity_chunks: &BTreeMap<String, Vec<ChunkRef>>,
    chunks: &BTreeMap<i64, Chunk>,
) -> ChunkTable {
    let mut interner = TextInterner::default();
    let mut refs = BTreeMap::new();
    let mut unresolved = 0usize;

    for name in visible.iter() {
        let Some(entity_refs) = entity_chunks.get(name) else {
            continue;
        };

        let mut resolved = Vec::with_capacity(entity_refs.len());
        for chunk_ref in entity_refs {
            match chunks.get(&chunk_ref.chunk_index) {
                Some(chunk) => resolved.push(ChunkRefView {
                    index: chunk_ref.chunk_index,
                    source_id: chunk_ref.source_id.clone(),
                    text_idx: interner.intern(&chunk.text),
                }),
                None => unresolved += 1,
            }
        }

        if !resolved.is_empty() {
            refs.insert(sanitize_id(name), resolved);
        }
    }

    if unresolved > 0 {
        debug!("Skipped {} chunk references with no matching chunk", unresolved);
    }

    ChunkTable {
        texts: interner.texts,
        refs,
    }
}
