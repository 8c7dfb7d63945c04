// Port for the hosted document database.
//
// Purpose
// - Describe the three operations the portal needs: point read, partial update, ordered read.
//
// Boundaries
// - No concrete input or output here. `in_memory` backs tests, `firestore` talks to the real backend.

use crate::shared::core::primitives::Document;
use crate::shared::core::registry::{Collection, Enumerated};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod firestore;
pub mod firestore_value;
pub mod in_memory;

#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed backend payload: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Slash-separated address of a collection or a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn collection(root: Collection) -> Self {
        Self(root.as_str().to_string())
    }

    pub fn doc(self, id: impl AsRef<str>) -> Self {
        Self(format!("{}/{}", self.0, id.as_ref()))
    }

    pub fn sub_collection(self, name: &str) -> Self {
        Self(format!("{}/{}", self.0, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits `a/b/c` into (`a/b`, `c`). A root collection has an empty parent.
    pub fn split_last(&self) -> (&str, &str) {
        match self.0.rsplit_once('/') {
            Some((parent, last)) => (parent, last),
            None => ("", &self.0),
        }
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `None` when the document does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DocumentStoreError>;

    /// Overwrites only the given top-level fields. Fails with `NotFound` if the document is missing.
    async fn update(&self, path: &DocumentPath, fields: Document) -> Result<(), DocumentStoreError>;

    /// All documents of a collection, ascending by `order_by`. Documents lacking the field are left out.
    async fn list_ordered(
        &self,
        collection: &DocumentPath,
        order_by: &str,
    ) -> Result<Vec<Document>, DocumentStoreError>;
}
