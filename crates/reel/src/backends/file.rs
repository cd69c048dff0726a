//! # 📁 THE FILE BACKEND
//!
//! 🗂️ The whole document store as one pretty-printed JSON file on disk:
//! `{collection: {id: {field: value}}}`. Good for laptops, demos and anyone without a cloud bill.
//!
//! 🦆 The duck reviewed the file format and had no notes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::backends::DocumentStore;
use crate::error::StoreError;
use crate::records::RawDocument;

type Collections = BTreeMap<String, BTreeMap<String, Map<String, Value>>>;

// -- 📁 FileStoreConfig lives next to FileStore. one backend = one config = one file.
#[derive(Debug, Deserialize, Clone)]
pub struct FileStoreConfig {
    /// 📁 Path to the JSON document file. Created on first write if it doesn't exist.
    pub path: PathBuf,
}

/// 📁 FileStore: a whole document store in one JSON file. `{collection: {id: {field: value}}}`.
///
/// Reads the file on every list, rewrites the file on every set. Not fast. Not clever.
/// Completely adequate for a thousand movies and a laptop.
///
/// ⚠️ The rewrite goes to a sibling temp file first and is then renamed over the original,
/// so a crash mid-write leaves the old file intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    config: FileStoreConfig,
}

impl FileStore {
    pub fn new(config: FileStoreConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    async fn load(&self) -> Result<Collections, StoreError> {
        let path = self.path();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            // -- 💤 no file yet means no documents yet. not an error, just a quiet store.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("📁 {} does not exist yet, treating it as empty", path.display());
                return Ok(Collections::new());
            }
            Err(err) => {
                return Err(StoreError::unavailable(
                    format!("could not read document file '{}'", path.display()),
                    err,
                ));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Collections::new());
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            StoreError::Malformed(format!(
                "document file '{}' is not a {{collection: {{id: fields}}}} JSON object: {err}",
                path.display()
            ))
        })
    }

    async fn persist(&self, collections: &Collections) -> Result<(), StoreError> {
        let path = self.path();
        let rendered = serde_json::to_vec_pretty(collections)
            .map_err(|err| StoreError::Malformed(format!("could not render documents: {err}")))?;

        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        tokio::fs::write(&temp_path, rendered).await.map_err(|err| {
            StoreError::unavailable(
                format!("could not write document file '{}'", temp_path.display()),
                err,
            )
        })?;
        tokio::fs::rename(&temp_path, path).await.map_err(|err| {
            StoreError::unavailable(
                format!("could not replace document file '{}'", path.display()),
                err,
            )
        })?;
        trace!("📁 rewrote {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        let mut collections = self.load().await?;
        let documents = collections
            .remove(collection)
            .map(|docs| {
                docs.into_iter()
                    .map(|(id, fields)| RawDocument::new(id, fields))
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
        let mut collections = self.load().await?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        self.persist(&collections).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_in(dir: &tempfile::TempDir) -> FileStore {
        FileStore::new(FileStoreConfig {
            path: dir.path().join("movies.json"),
        })
    }

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("💀 expected an object, got {other}"),
        }
    }

    #[tokio::test]
    async fn the_one_where_a_missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().expect("💀 tempdir");
        let store = store_in(&dir);
        let documents = store
            .list_documents("movies")
            .await
            .expect("💀 a missing file should read as empty");
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn the_one_where_writes_survive_a_new_handle() {
        let dir = tempfile::tempdir().expect("💀 tempdir");
        store_in(&dir)
            .set_document("movies", "abc", fields(json!({"name": "Heat"})))
            .await
            .expect("💀 write");

        let documents = store_in(&dir)
            .list_documents("movies")
            .await
            .expect("💀 read back");
        assert_eq!(documents, vec![RawDocument::new("abc", fields(json!({"name": "Heat"})))]);
        assert!(!dir.path().join("movies.json.tmp").exists());
    }

    #[tokio::test]
    async fn the_one_where_set_replaces_the_whole_document() {
        let dir = tempfile::tempdir().expect("💀 tempdir");
        let store = store_in(&dir);
        store
            .set_document("movies", "abc", fields(json!({"name": "Heat", "year": 1995})))
            .await
            .expect("💀 first write");
        store
            .set_document("movies", "abc", fields(json!({"name": "Heat"})))
            .await
            .expect("💀 second write");

        let documents = store.list_documents("movies").await.expect("💀 read back");
        assert_eq!(documents.len(), 1);
        assert!(!documents[0].fields.contains_key("year"));
    }

    #[tokio::test]
    async fn the_one_where_garbage_on_disk_is_called_out() {
        let dir = tempfile::tempdir().expect("💀 tempdir");
        std::fs::write(dir.path().join("movies.json"), "[1, 2, 3]").expect("💀 write garbage");
        let err = store_in(&dir)
            .list_documents("movies")
            .await
            .expect_err("💀 an array is not a document file");
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
