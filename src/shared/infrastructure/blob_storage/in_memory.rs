// In memory implementation of the BlobStorage port.
//
// Responsibilities
// - Keep uploaded bytes per path.
// - Emit one progress snapshot per chunk, like a resumable upload would.

use crate::shared::core::primitives::UploadFile;
use crate::shared::infrastructure::blob_storage::{
    BlobStorage, BlobStorageError, ProgressCallback, UploadSnapshot, UploadState, report_progress,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

pub struct InMemoryBlobStorage {
    bucket: String,
    chunk_size: usize,
    objects: RwLock<HashMap<String, StoredObject>>,
    uploads: AtomicUsize,
    is_offline: bool,
}

impl InMemoryBlobStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            objects: RwLock::new(HashMap::new()),
            uploads: AtomicUsize::new(0),
            is_offline: false,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait::async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(
        &self,
        path: &str,
        file: &UploadFile,
        on_progress: Option<&ProgressCallback<'_>>,
    ) -> Result<UploadSnapshot, BlobStorageError> {
        if self.is_offline {
            return Err(BlobStorageError::Backend("Blob storage offline".into()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);

        let total_bytes = file.len();
        let mut snapshot = UploadSnapshot {
            path: path.to_string(),
            bytes_transferred: 0,
            total_bytes,
            state: UploadState::Running,
        };
        for chunk in file.bytes.chunks(self.chunk_size) {
            snapshot.bytes_transferred += chunk.len() as u64;
            if snapshot.bytes_transferred == total_bytes {
                snapshot.state = UploadState::Success;
            }
            report_progress(on_progress, &snapshot);
        }
        if file.is_empty() {
            snapshot.state = UploadState::Success;
            report_progress(on_progress, &snapshot);
        }

        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                bytes: file.bytes.clone(),
                content_type: file.content_type.clone(),
            },
        );
        Ok(snapshot)
    }

    async fn download_url(&self, path: &str) -> Result<String, BlobStorageError> {
        if self.is_offline {
            return Err(BlobStorageError::Backend("Blob storage offline".into()));
        }
        if !self.objects.read().await.contains_key(path) {
            return Err(BlobStorageError::NotFound(path.to_string()));
        }
        Ok(format!("memory://{}/{}", self.bucket, path))
    }
}
