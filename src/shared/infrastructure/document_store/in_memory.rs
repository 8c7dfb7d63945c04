// In memory implementation of the DocumentStore port.
//
// Purpose
// - Support accessor and store tests and local development without a backend.
//
// Responsibilities
// - Keep documents in a map keyed by their full path.
// - Count calls so tests can assert that validation happened before any remote access.

use crate::shared::core::primitives::Document;
use crate::shared::infrastructure::document_store::{DocumentPath, DocumentStore, DocumentStoreError};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    delay_ms: AtomicU64,
    is_offline: bool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Delays every read by `ms` milliseconds.
    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.store(ms, AtomicOrdering::SeqCst);
    }

    /// Seeds or replaces a whole document.
    pub async fn insert(&self, path: &DocumentPath, document: Document) {
        self.documents
            .write()
            .await
            .insert(path.as_str().to_string(), document);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    async fn enter(&self) -> Result<(), DocumentStoreError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.is_offline {
            return Err(DocumentStoreError::Backend("Document store offline".into()));
        }
        let delay = self.delay_ms.load(AtomicOrdering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DocumentStoreError> {
        self.enter().await?;
        Ok(self.documents.read().await.get(path.as_str()).cloned())
    }

    async fn update(&self, path: &DocumentPath, fields: Document) -> Result<(), DocumentStoreError> {
        self.enter().await?;
        let mut guard = self.documents.write().await;
        let document = guard
            .get_mut(path.as_str())
            .ok_or_else(|| DocumentStoreError::NotFound(path.to_string()))?;
        for (key, value) in fields {
            document.insert(key, value);
        }
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(())
    }

    async fn list_ordered(
        &self,
        collection: &DocumentPath,
        order_by: &str,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        self.enter().await?;
        let prefix = format!("{}/", collection.as_str());
        let guard = self.documents.read().await;
        let mut items: Vec<Document> = guard
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(&prefix)
                    .is_some_and(|id| !id.is_empty() && !id.contains('/'))
            })
            .filter(|(_, document)| document.contains_key(order_by))
            .map(|(_, document)| document.clone())
            .collect();
        items.sort_by(|a, b| compare_values(&a[order_by], &b[order_by]));
        Ok(items)
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

// Mixed types order by type first, the way the backend does.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
