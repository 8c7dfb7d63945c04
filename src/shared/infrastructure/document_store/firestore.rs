// DocumentStore backed by the Firestore REST API (v1).
//
// Responsibilities
// - Address documents under `projects/{project}/databases/(default)/documents`.
// - Translate plain JSON documents to and from typed Firestore values.
// - Map "not found" on reads to `None`, everything else non-2xx to an error.

use crate::shared::core::primitives::Document;
use crate::shared::infrastructure::document_store::firestore_value::{decode_fields, encode_fields};
use crate::shared::infrastructure::document_store::{DocumentPath, DocumentStore, DocumentStoreError};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

pub struct FirestoreDocumentStore {
    client: Client,
    documents_url: Url,
    api_key: Option<String>,
    id_token: Option<String>,
}

#[derive(Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct RunQueryItem {
    document: Option<FirestoreDocument>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirestoreDocumentStore {
    pub fn new(client: Client, base_url: &str, project_id: &str) -> Result<Self, DocumentStoreError> {
        let mut documents_url = Url::parse(base_url)
            .map_err(|e| DocumentStoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        documents_url
            .path_segments_mut()
            .map_err(|_| DocumentStoreError::InvalidUrl(base_url.to_string()))?
            .pop_if_empty()
            .extend(["projects", project_id, "databases", "(default)", "documents"]);
        Ok(Self {
            client,
            documents_url,
            api_key: None,
            id_token: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = id_token;
        self
    }

    fn document_url(&self, path: &DocumentPath) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(path.as_str().split('/'));
        }
        url
    }

    fn run_query_url(&self, parent: &str) -> Url {
        let mut url = self.documents_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            if parent.is_empty() {
                segments.pop().push("documents:runQuery");
            } else {
                let mut parts: Vec<&str> = parent.split('/').collect();
                let last = parts.pop().unwrap_or_default();
                segments.extend(parts).push(&format!("{last}:runQuery"));
            }
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        };
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DocumentStoreError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| DocumentStoreError::Transport(e.to_string()))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DocumentStoreError> {
        debug!(%path, "firestore get");
        let response = self.send(self.client.get(self.document_url(path))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(backend_error(response, path).await);
        }
        let document: FirestoreDocument = response
            .json()
            .await
            .map_err(|e| DocumentStoreError::Decode(e.to_string()))?;
        decode_fields(&document.fields).map(Some)
    }

    async fn update(&self, path: &DocumentPath, fields: Document) -> Result<(), DocumentStoreError> {
        // An empty mask would replace the whole document.
        if fields.is_empty() {
            return match self.get(path).await? {
                Some(_) => Ok(()),
                None => Err(DocumentStoreError::NotFound(path.to_string())),
            };
        }

        debug!(%path, fields = fields.len(), "firestore update");
        let mut mask: Vec<(&str, String)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", field_path(key)))
            .collect();
        mask.push(("currentDocument.exists", "true".to_string()));
        let body = json!({ "fields": encode_fields(&fields) });

        let request = self
            .client
            .patch(self.document_url(path))
            .query(&mask)
            .json(&body);
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(backend_error(response, path).await);
        }
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &DocumentPath,
        order_by: &str,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let (parent, collection_id) = collection.split_last();
        debug!(%collection, order_by, "firestore runQuery");
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection_id }],
                "orderBy": [{
                    "field": { "fieldPath": field_path(order_by) },
                    "direction": "ASCENDING"
                }]
            }
        });

        let request = self.client.post(self.run_query_url(parent)).json(&body);
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(backend_error(response, collection).await);
        }
        let items: Vec<RunQueryItem> = response
            .json()
            .await
            .map_err(|e| DocumentStoreError::Decode(e.to_string()))?;
        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|document| decode_fields(&document.fields))
            .collect()
    }
}

async fn backend_error(response: Response, path: &DocumentPath) -> DocumentStoreError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return DocumentStoreError::NotFound(path.to_string());
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    warn!(%path, status = status.as_u16(), %message, "firestore request failed");
    DocumentStoreError::Backend(format!("{} {}", status.as_u16(), message))
}

/// Field names outside `[A-Za-z_][A-Za-z0-9_]*` must be back-quoted in field paths.
fn field_path(key: &str) -> String {
    let simple = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        key.to_string()
    } else {
        format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
