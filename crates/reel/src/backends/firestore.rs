//! # 📡 THE FIRESTORE BACKEND
//!
//! 🚀 Talks to Cloud Firestore (or its emulator) over the REST API. Two calls, that's it:
//!
//! - list: `GET {base}/v1/projects/{project}/databases/{db}/documents/{collection}?pageSize=N`,
//!   following `nextPageToken` until the store runs out of documents.
//! - set: `PATCH {base}/v1/projects/{project}/databases/{db}/documents/{collection}/{id}` with
//!   `{"fields": ...}` and no update mask. No mask means the document is replaced in full, and a
//!   document that didn't exist gets created. Upsert, courtesy of Google.
//!
//! 🔒 Auth is a bearer token handed to us in config. Minting tokens from service-account keys is
//! somebody else's job; by the time we get here the token is either valid or it isn't.
//! The emulator accepts `owner` as a token, or no token at all.
//!
//! 🦆 (mandatory duck, no context provided, none shall be requested)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::backends::DocumentStore;
use crate::error::StoreError;
use crate::records::RawDocument;

mod values;

/// 🔧 How to reach a Firestore database.
#[derive(Debug, Deserialize, Clone)]
pub struct FirestoreConfig {
    /// 🏷️ The GCP project id. Not the project number, not the display name. The id.
    pub project_id: String,
    /// 🗄️ Database id. Almost everyone has exactly one and it's called `(default)`.
    #[serde(default = "default_database")]
    pub database: String,
    /// 📡 Scheme + host (+ port). Point it at `http://localhost:8080` for the emulator.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 🔒 OAuth2 bearer token. Optional, because the emulator doesn't care.
    #[serde(default)]
    pub access_token: Option<String>,
    /// 📦 Documents per list page. Firestore caps this server-side anyway.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_page_size() -> u32 {
    300
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl FirestoreConfig {
    /// 🏗️ A config with every optional knob at its default.
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: default_database(),
            base_url: default_base_url(),
            access_token: None,
            page_size: default_page_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// 📨 One page of `documents.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// 📄 A document as Firestore sends it. `name` is the full resource path; the id is its tail.
#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl WireDocument {
    fn into_raw(self) -> RawDocument {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or(self.name.as_str())
            .to_string();
        RawDocument::new(id, values::decode_fields(&self.fields))
    }
}

/// 📡 A Firestore REST client. One per process; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreStore {
    /// 🚀 Build the HTTP client. No network traffic happens here.
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| StoreError::unavailable("could not build the HTTP client", err))?;
        Ok(Self { client, config })
    }

    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base).map_err(|err| {
            StoreError::unavailable(format!("'{base}' is not a usable Firestore URL"), err)
        })?;
        // -- every piece goes in as its own escaped segment, so `?`, `#` and `%` in a name stay names
        url.path_segments_mut()
            .map_err(|_| StoreError::unavailable_because(format!("'{base}' cannot take a path")))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                "documents",
                collection,
            ]);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 🚦 Turn a non-success status into the right kind of error.
    ///
    /// 401/403 mean the credentials are bad, 5xx means the store is having a day. Both are
    /// "unavailable" from where we sit. Anything else is the store rejecting our request.
    async fn status_error(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::unavailable_because(
                format!("Firestore refused our credentials ({status}): {body}"),
            ),
            s if s.is_server_error() => StoreError::unavailable_because(format!(
                "Firestore answered {status}: {body}"
            )),
            _ => StoreError::Rejected {
                status: status.as_u16(),
                body,
            },
        }
    }

    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse, StoreError> {
        let mut url = self.collection_url(collection)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.config.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }

        let response = self
            .authorize(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|err| StoreError::unavailable(format!("could not reach {url}"), err))?;

        if response.status() == StatusCode::NOT_FOUND {
            // -- 💤 an empty collection lists as 200 `{}`. a 404 means the project or database is wrong.
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::unavailable_because(format!(
                "Firestore has no database at {url} (404): {body}"
            )));
        }
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|err| StoreError::unavailable(format!("lost the connection reading {url}"), err))?;
        serde_json::from_str(&body).map_err(|err| {
            StoreError::Malformed(format!("documents.list page for '{collection}': {err}"))
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<RawDocument>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.list_page(collection, page_token.as_deref()).await?;
            pages += 1;
            documents.extend(page.documents.into_iter().map(WireDocument::into_raw));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(next) if Some(&next) == page_token.as_ref() => {
                    // -- 🔄 same token twice means the server is looping us. bail with what we have.
                    warn!("📡 Firestore repeated page token for '{collection}', stopping early");
                    break;
                }
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(
            "📡 listed {} documents from '{collection}' in {pages} page(s)",
            documents.len()
        );
        Ok(documents)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut url = self.collection_url(collection)?;
        url.path_segments_mut()
            .map_err(|_| StoreError::unavailable_because("Firestore base URL cannot take a path"))?
            .push(id);

        let mut body = Map::with_capacity(1);
        body.insert(
            "fields".into(),
            Value::Object(values::encode_fields(&fields)),
        );

        let response = self
            .authorize(self.client.patch(url.clone()))
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|err| StoreError::unavailable(format!("could not reach {url}"), err))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        trace!("🚀 Firestore accepted {collection}/{id}");
        Ok(())
    }
}
