//! 🔌 Backends: where the real I/O happens.
//!
//! 🗄️ A backend is a document store: it lists every document in a collection, and it
//! replaces (or creates) one document by id. That's the whole contract. Two verbs.
//! Fewer verbs than a toddler, and about as opinionated.
//!
//! 🎭 This module is the casting agency. Need Firestore? A JSON file on disk?
//! Something that lives and dies in RAM for the length of a test? We've got a backend for that.
//!
//! 🦆 The duck is here because every file must have one. This is law.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::StoreError;
use crate::records::RawDocument;

pub mod file;
pub mod firestore;
pub mod in_mem;

pub use file::{FileStore, FileStoreConfig};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use in_mem::InMemoryStore;

/// 🗄️ A document store that holds named collections of schema-flexible documents.
///
/// # Contract
/// - `list_documents` returns every document in the collection, in store order. A collection
///   that doesn't exist yet is just empty, not an error.
/// - `set_document` replaces the document at `id` in full. Fields not in `fields` are gone
///   afterwards. If there was no document at `id`, there is now.
/// - Connection and auth problems come back as `StoreError::StoreUnavailable`.
#[async_trait]
pub trait DocumentStore: std::fmt::Debug + Send + Sync {
    /// 📥 Every document in `collection`.
    async fn list_documents(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError>;

    /// 📤 Full-replace upsert of one document.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;
}

/// 🔧 Which store to talk to, and how. Externally tagged, so in TOML it reads as
/// `[store.Firestore]`, `[store.File]` or `[store.InMemory]`.
///
/// The lowercase aliases are for env vars, which figment lowercases on the way in:
/// `REEL_STORE__FIRESTORE__PROJECT_ID=my-project`.
#[derive(Debug, Deserialize, Clone)]
pub enum StoreConfig {
    #[serde(alias = "in_memory", alias = "inmemory")]
    InMemory {},
    #[serde(alias = "file")]
    File(FileStoreConfig),
    #[serde(alias = "firestore")]
    Firestore(FirestoreConfig),
}

/// 🎭 The many faces of a store, dispatched by enum so the catalog never needs to know
/// whether it's talking to Google, a file, or a HashMap with delusions of grandeur.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    InMemory(InMemoryStore),
    File(FileStore),
    Firestore(FirestoreStore),
}

impl StoreBackend {
    /// 🚀 Build the one store handle this process will use.
    ///
    /// For Firestore this builds the HTTP client; the first request is what proves the
    /// credentials, so a bad token shows up on the first read, not here.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let backend = match config {
            StoreConfig::InMemory {} => StoreBackend::InMemory(InMemoryStore::new()),
            StoreConfig::File(file_config) => StoreBackend::File(FileStore::new(file_config.clone())),
            StoreConfig::Firestore(firestore_config) => {
                StoreBackend::Firestore(FirestoreStore::new(firestore_config.clone())?)
            }
        };
        info!("🗄️ store backend ready: {}", backend.describe());
        Ok(backend)
    }

    /// 🏷️ A one-liner for logs and the CLI header.
    pub fn describe(&self) -> String {
        match self {
            StoreBackend::InMemory(_) => "in-memory".to_string(),
            StoreBackend::File(store) => format!("file ({})", store.path().display()),
            StoreBackend::Firestore(store) => format!("firestore ({})", store.project_id()),
        }
    }
}

#[async_trait]
impl DocumentStore for StoreBackend {
    async fn list_documents(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        match self {
            StoreBackend::InMemory(store) => store.list_documents(collection).await,
            StoreBackend::File(store) => store.list_documents(collection).await,
            StoreBackend::Firestore(store) => store.list_documents(collection).await,
        }
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        match self {
            StoreBackend::InMemory(store) => store.set_document(collection, id, fields).await,
            StoreBackend::File(store) => store.set_document(collection, id, fields).await,
            StoreBackend::Firestore(store) => store.set_document(collection, id, fields).await,
        }
    }
}
