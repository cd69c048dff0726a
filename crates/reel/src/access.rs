//! 🚰 Data access: read the whole collection, write one movie. Two functions, one contract.
//!
//! - [`fetch_all`] pulls every document, decodes what it can, and parks the rest in
//!   `CollectionSnapshot::skipped` with a `warn!` per casualty. Skip-and-continue.
//! - [`upsert`] hashes the record into its `DocumentId` and full-replaces the document there.
//!
//! Neither one caches and neither one validates. Caching is `SnapshotCache`'s job, validation is
//! `NewMovie`'s. These two just move bytes and keep their promises.

use tracing::{debug, info, warn};

use crate::backends::DocumentStore;
use crate::error::StoreError;
use crate::identity::{DocumentId, compute_document_id};
use crate::records::{CollectionSnapshot, MovieRecord};

/// 📥 Read every document in `collection` into a fresh snapshot.
///
/// Row order is whatever the store hands back.
pub async fn fetch_all<S>(store: &S, collection: &str) -> Result<CollectionSnapshot, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.list_documents(collection).await?;
    let fetched = documents.len();
    let (snapshot, failures) = CollectionSnapshot::from_documents(collection, documents);

    for failure in &failures {
        warn!("⚠️ skipping document: {failure}");
    }
    if failures.is_empty() {
        debug!("📥 fetched {fetched} documents from '{collection}'");
    } else {
        info!(
            "📥 fetched {fetched} documents from '{collection}', skipped {} that would not decode",
            failures.len()
        );
    }
    Ok(snapshot)
}

/// 📤 Write `record` under its content-derived id, replacing whatever lived there.
///
/// Fields are written exactly as given. Trim them first if you want the stored text tidy;
/// the id is trim- and case-insensitive either way.
pub async fn upsert<S>(
    store: &S,
    collection: &str,
    record: &MovieRecord,
) -> Result<DocumentId, StoreError>
where
    S: DocumentStore + ?Sized,
{
    let doc_id = compute_document_id(
        &record.name,
        &record.company,
        &record.director,
        &record.genre,
    );
    store
        .set_document(collection, doc_id.as_str(), record.to_fields())
        .await?;
    debug!("📤 upserted '{}' as {collection}/{doc_id}", record.name);
    Ok(doc_id)
}
