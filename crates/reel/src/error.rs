//! 💀 Errors: the taxonomy of things that go wrong between us and the store.
//!
//! 🧠 Knowledge graph:
//! - `StoreError::StoreUnavailable`: can't connect, can't authenticate, store is on fire. Fatal for
//!   the current operation. Surfaced. Never retried behind your back.
//! - `StoreError::PartialReadFailure`: one document would not decode. Under the skip policy this never
//!   escapes `fetch_all`; it is logged and parked in `CollectionSnapshot::skipped` instead.
//! - `StoreError::Malformed` / `StoreError::Rejected`: the store answered, but not in a way we can use.
//! - `ValidationFailure`: the insert form was missing something. Caught before any write happens.
//!
//! The library speaks `thiserror`; the CLI wraps everything in `anyhow` and walks the chain.

use thiserror::Error;

/// 💀 Everything the data access layer can report about the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 📡 The store could not be reached or refused our credentials.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// 📄 A single document could not be decoded into a movie record.
    #[error("document '{doc_id}' in collection '{collection}' could not be decoded: {reason}")]
    PartialReadFailure {
        collection: String,
        doc_id: String,
        reason: String,
    },

    /// 🧩 The store's response as a whole made no sense to us.
    #[error("store returned a malformed response: {0}")]
    Malformed(String),

    /// 🚫 The store understood the request and said no.
    #[error("store rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl StoreError {
    /// 📡 Shorthand for the connection-ish failure with a cause attached.
    pub fn unavailable(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::StoreUnavailable {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// 📡 Same as [`StoreError::unavailable`] but when there's no underlying error to blame.
    pub fn unavailable_because(reason: impl Into<String>) -> Self {
        StoreError::StoreUnavailable {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::StoreUnavailable { .. })
    }
}

/// 📝 The insert form came back with blanks.
///
/// `missing_fields` lists the field names (`name`, `company`, `director`, `genre`) that were empty
/// or whitespace-only, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all fields are required; empty: {}", .missing_fields.join(", "))]
pub struct ValidationFailure {
    pub missing_fields: Vec<&'static str>,
}

/// 🎬 What can go wrong when inserting through the catalog: bad form, or bad store.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Store(#[from] StoreError),
}
