//! 🧊 SnapshotCache: so the whole collection isn't refetched every time someone blinks.
//!
//! Each collection has a generation counter. A cached snapshot remembers the generation it was
//! built at. Writes bump the counter; a snapshot from an older generation is stale and gets
//! refetched on the next read. `clear()` is the big red button: everything goes stale at once.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::records::CollectionSnapshot;

#[derive(Debug)]
struct CacheEntry {
    generation: u64,
    snapshot: Arc<CollectionSnapshot>,
}

/// 🧊 Last snapshot per collection, plus the generation bookkeeping that says whether it's still good.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    generations: HashMap<String, u64>,
    entries: HashMap<String, CacheEntry>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 🔢 Current generation for `collection`. Starts at 0, only ever goes up.
    pub fn generation(&self, collection: &str) -> u64 {
        self.generations.get(collection).copied().unwrap_or(0)
    }

    /// 🔍 The cached snapshot, but only if nothing has been written since it was taken.
    pub fn get(&self, collection: &str) -> Option<Arc<CollectionSnapshot>> {
        let current = self.generation(collection);
        self.entries
            .get(collection)
            .filter(|entry| entry.generation == current)
            .map(|entry| Arc::clone(&entry.snapshot))
    }

    /// 📥 Store a snapshot that was fetched while the collection was at `generation`.
    ///
    /// If a write bumped the counter while the fetch was in flight, the snapshot is handed back
    /// but not kept, so the next read fetches again.
    pub fn put(
        &mut self,
        collection: &str,
        generation: u64,
        snapshot: CollectionSnapshot,
    ) -> Arc<CollectionSnapshot> {
        let snapshot = Arc::new(snapshot);
        if generation == self.generation(collection) {
            self.entries.insert(
                collection.to_string(),
                CacheEntry {
                    generation,
                    snapshot: Arc::clone(&snapshot),
                },
            );
        } else {
            trace!("🧊 '{collection}' moved on during the fetch, not caching the stale snapshot");
        }
        snapshot
    }

    /// 🗑️ Mark `collection` stale. Called after every write.
    pub fn invalidate(&mut self, collection: &str) {
        *self.generations.entry(collection.to_string()).or_insert(0) += 1;
        self.entries.remove(collection);
        trace!(
            "🧊 '{collection}' invalidated, now at generation {}",
            self.generation(collection)
        );
    }

    /// 💣 Mark every collection stale.
    pub fn clear(&mut self) {
        let collections: Vec<String> = self.entries.keys().cloned().collect();
        for collection in collections {
            self.invalidate(&collection);
        }
        self.entries.clear();
    }

    pub fn is_cached(&self, collection: &str) -> bool {
        self.get(collection).is_some()
    }
}
