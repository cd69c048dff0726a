//! # 📦 THE IN-MEMORY BACKEND
//!
//! 🎬 Collections that live in RAM and vanish when the process does. Tests use it to seed and
//! peek at documents; the CLI only gets it when the config asks for `[store.InMemory]` by name.
//!
//! ⚠️ Nothing written here survives a restart. That's the feature, not the bug.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::trace;

use crate::backends::DocumentStore;
use crate::error::StoreError;
use crate::records::RawDocument;

type Collections = BTreeMap<String, BTreeMap<String, Map<String, Value>>>;

/// 📦 A store that never forgets, until the process exits and it forgets everything.
///
/// `InMemoryStore` keeps collections in a `BTreeMap` of `BTreeMap`s wrapped in a Mutex wrapped
/// in an Arc. Clone it, hand one copy to the catalog, keep the other for peeking in tests.
/// Everyone shares the same maps. Communist data, but in a good way.
///
/// 🧠 Ordering: documents list in id order. That's "store-defined" order for this store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    collections: Arc<Mutex<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 🌱 Pre-load documents verbatim. Handy for fixtures with odd-shaped fields.
    pub async fn seed(&self, collection: &str, documents: Vec<RawDocument>) {
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        for document in documents {
            docs.insert(document.id, document.fields);
        }
    }

    /// 🔢 How many documents live in `collection` right now.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// 🔍 The raw fields stored at `id`, if any.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Map<String, Value>> {
        self.collections
            .lock()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        let collections = self.collections.lock().await;
        let documents = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| RawDocument::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        // 🔒 insert replaces the whole map at `id`. full replace, no merge. that's the contract.
        let previous = self
            .collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        trace!(
            "📦 in-memory set {collection}/{id} ({})",
            if previous.is_some() { "replaced" } else { "created" }
        );
        Ok(())
    }
}
