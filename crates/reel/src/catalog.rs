//! 🎬 MovieCatalog: the one object the front end talks to.
//!
//! It owns the process-wide store handle and the snapshot cache, and wires the two data access
//! calls together with the cache rules:
//!
//! - reads go through the cache and only hit the store when the cached snapshot is stale;
//! - inserts validate, upsert, then invalidate, so the very next read sees the new row.
//!
//! Everything that mutates takes `&mut self`. One session, one operation in flight. No locks.

use std::sync::Arc;

use tracing::{debug, info};

use crate::access;
use crate::backends::{DocumentStore, StoreBackend};
use crate::cache::SnapshotCache;
use crate::error::{InsertError, StoreError};
use crate::form::NewMovie;
use crate::identity::DocumentId;
use crate::records::CollectionSnapshot;

/// 🎬 Store handle + snapshot cache.
#[derive(Debug)]
pub struct MovieCatalog<S = StoreBackend> {
    store: S,
    cache: SnapshotCache,
}

impl<S> MovieCatalog<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: SnapshotCache::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 📸 The current snapshot of `collection`, from cache if nothing changed since the last read.
    pub async fn snapshot(
        &mut self,
        collection: &str,
    ) -> Result<Arc<CollectionSnapshot>, StoreError> {
        if let Some(cached) = self.cache.get(collection) {
            debug!("🧊 serving '{collection}' from cache");
            return Ok(cached);
        }
        let generation = self.cache.generation(collection);
        let snapshot = access::fetch_all(&self.store, collection).await?;
        Ok(self.cache.put(collection, generation, snapshot))
    }

    /// 🔄 Drop the cached snapshot for `collection` and read it again.
    pub async fn refresh(
        &mut self,
        collection: &str,
    ) -> Result<Arc<CollectionSnapshot>, StoreError> {
        self.cache.invalidate(collection);
        self.snapshot(collection).await
    }

    /// ➕ Validate the form, upsert the movie, and invalidate the cache.
    ///
    /// A validation failure means no write was attempted and the cache stays. A store failure
    /// still invalidates: a timed-out write may have landed anyway.
    pub async fn insert(
        &mut self,
        collection: &str,
        movie: &NewMovie,
    ) -> Result<DocumentId, InsertError> {
        let record = movie.validate()?;
        let written = access::upsert(&self.store, collection, &record).await;
        self.cache.invalidate(collection);
        let doc_id = written?;
        info!("➕ saved '{}' as {collection}/{doc_id}", record.name);
        Ok(doc_id)
    }

    /// 💣 Forget every cached snapshot.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn is_cached(&self, collection: &str) -> bool {
        self.cache.is_cached(collection)
    }
}
