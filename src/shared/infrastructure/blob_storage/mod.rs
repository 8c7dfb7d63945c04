// Port for the hosted file storage.
//
// Purpose
// - Upload a file to a hierarchical path, reporting progress, and resolve a public download URL.
//
// Boundaries
// - No concrete input or output here. `in_memory` backs tests, `firebase_storage` talks to the real backend.

use crate::shared::core::primitives::UploadFile;
use async_trait::async_trait;
use thiserror::Error;

pub mod firebase_storage;
pub mod in_memory;

#[derive(Debug, Error)]
pub enum BlobStorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upload protocol error: {0}")]
    Protocol(String),

    #[error("no download token for {0}")]
    NoDownloadToken(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Running,
    Success,
}

/// Progress of one upload at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSnapshot {
    pub path: String,
    pub bytes_transferred: u64,
    pub total_bytes: u64,
    pub state: UploadState,
}

impl UploadSnapshot {
    /// `bytes_transferred / total_bytes * 100`; an empty file counts as fully sent.
    pub fn progress_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        self.bytes_transferred as f64 / self.total_bytes as f64 * 100.0
    }
}

/// Receives `(percent, snapshot)` between chunks. Calls are best-effort, not necessarily monotonic.
pub type ProgressCallback<'a> = dyn Fn(f64, &UploadSnapshot) + Send + Sync + 'a;

pub fn report_progress(on_progress: Option<&ProgressCallback<'_>>, snapshot: &UploadSnapshot) {
    if let Some(callback) = on_progress {
        callback(snapshot.progress_percent(), snapshot);
    }
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Uploads (or overwrites) the object at `path` and returns the final snapshot.
    async fn upload(
        &self,
        path: &str,
        file: &UploadFile,
        on_progress: Option<&ProgressCallback<'_>>,
    ) -> Result<UploadSnapshot, BlobStorageError>;

    async fn download_url(&self, path: &str) -> Result<String, BlobStorageError>;
}
