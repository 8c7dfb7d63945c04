// BlobStorage backed by the Firebase Storage REST API (v0).
//
// Responsibilities
// - Upload through a resumable session: one `start`, then fixed-size chunks, the last one finalizing.
// - Report progress after every acknowledged chunk.
// - Resolve the tokenized public download URL from the object metadata.

use crate::shared::core::primitives::UploadFile;
use crate::shared::infrastructure::blob_storage::{
    BlobStorage, BlobStorageError, ProgressCallback, UploadSnapshot, UploadState, report_progress,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

pub const DEFAULT_STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";
/// Chunks other than the last must be a multiple of this.
pub const CHUNK_GRANULARITY: usize = 256 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

pub struct FirebaseBlobStorage {
    client: Client,
    objects_url: Url,
    id_token: Option<String>,
    chunk_size: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

impl FirebaseBlobStorage {
    pub fn new(client: Client, base_url: &str, bucket: &str) -> Result<Self, BlobStorageError> {
        let mut objects_url = Url::parse(base_url)
            .map_err(|e| BlobStorageError::InvalidUrl(format!("{base_url}: {e}")))?;
        objects_url
            .path_segments_mut()
            .map_err(|_| BlobStorageError::InvalidUrl(base_url.to_string()))?
            .pop_if_empty()
            .extend(["b", bucket, "o"]);
        Ok(Self {
            client,
            objects_url,
            id_token: None,
            chunk_size: CHUNK_GRANULARITY,
        })
    }

    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = id_token;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The object path is a single, fully escaped segment.
    fn object_url(&self, path: &str) -> Url {
        let mut url = self.objects_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(path);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BlobStorageError> {
        let request = match &self.id_token {
            Some(token) => request.header("Authorization", format!("Firebase {token}")),
            None => request,
        };
        request
            .send()
            .await
            .map_err(|e| BlobStorageError::Transport(e.to_string()))
    }

    async fn start_session(&self, path: &str, file: &UploadFile) -> Result<String, BlobStorageError> {
        let content_type = file.content_type.as_deref().unwrap_or(OCTET_STREAM);
        let request = self
            .client
            .post(self.objects_url.clone())
            .query(&[("name", path), ("uploadType", "resumable")])
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", file.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", content_type)
            .json(&json!({ "name": path, "contentType": content_type }));
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(backend_error(response, path).await);
        }
        response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| BlobStorageError::Protocol("start response without X-Goog-Upload-URL".into()))
    }
}

#[async_trait::async_trait]
impl BlobStorage for FirebaseBlobStorage {
    async fn upload(
        &self,
        path: &str,
        file: &UploadFile,
        on_progress: Option<&ProgressCallback<'_>>,
    ) -> Result<UploadSnapshot, BlobStorageError> {
        debug!(path, bytes = file.len(), "starting resumable upload");
        let session_url = self.start_session(path, file).await?;

        let total = file.bytes.len();
        let mut snapshot = UploadSnapshot {
            path: path.to_string(),
            bytes_transferred: 0,
            total_bytes: file.len(),
            state: UploadState::Running,
        };
        let mut offset = 0usize;
        loop {
            let end = (offset + self.chunk_size).min(total);
            let is_last = end == total;
            let command = if is_last { "upload, finalize" } else { "upload" };
            let request = self
                .client
                .post(&session_url)
                .header("X-Goog-Upload-Protocol", "resumable")
                .header("X-Goog-Upload-Command", command)
                .header("X-Goog-Upload-Offset", offset.to_string())
                .body(file.bytes[offset..end].to_vec());
            let response = self.send(request).await?;
            if !response.status().is_success() {
                return Err(backend_error(response, path).await);
            }

            snapshot.bytes_transferred = end as u64;
            if is_last {
                let metadata: ObjectMetadata = response
                    .json()
                    .await
                    .map_err(|e| BlobStorageError::Protocol(e.to_string()))?;
                debug!(name = %metadata.name, "upload finalized");
                snapshot.state = UploadState::Success;
                report_progress(on_progress, &snapshot);
                return Ok(snapshot);
            }
            report_progress(on_progress, &snapshot);
            offset = end;
        }
    }

    async fn download_url(&self, path: &str) -> Result<String, BlobStorageError> {
        let response = self.send(self.client.get(self.object_url(path))).await?;
        if !response.status().is_success() {
            return Err(backend_error(response, path).await);
        }
        let metadata: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| BlobStorageError::Protocol(e.to_string()))?;
        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').map(str::trim).find(|t| !t.is_empty()))
            .ok_or_else(|| BlobStorageError::NoDownloadToken(path.to_string()))?;

        let mut url = self.object_url(path);
        url.query_pairs_mut()
            .append_pair("alt", "media")
            .append_pair("token", token);
        Ok(url.to_string())
    }
}

async fn backend_error(response: Response, path: &str) -> BlobStorageError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return BlobStorageError::NotFound(path.to_string());
    }
    let body = response.text().await.unwrap_or_default();
    warn!(path, status = status.as_u16(), %body, "storage request failed");
    BlobStorageError::Backend(format!("{} {}", status.as_u16(), body))
}

#[cfg(test)]
mod firebase_blob_storage_tests {
    use super::*;
    use crate::tests::fixtures::http::{FakeBackend, RecordedRequest, Reply};
    use rstest::rstest;
    use std::sync::Mutex;

    const OBJECT: &str = "employee_documents/u1/ktp-u1.jpg";
    const ENCODED_OBJECT: &str = "employee_documents%2Fu1%2Fktp-u1.jpg";

    fn resumable_backend(request: &RecordedRequest) -> Reply {
        let host = request.header("host").unwrap_or_default();
        match request.header("x-goog-upload-command").as_deref() {
            Some("start") => Reply::status(200)
                .with_header("x-goog-upload-url", format!("http://{host}/upload/session-1"))
                .with_header("x-goog-upload-status", "active"),
            Some("upload") => Reply::status(200).with_header("x-goog-upload-status", "active"),
            Some("upload, finalize") => Reply::json(
                200,
                json!({ "name": OBJECT, "bucket": "bucket", "downloadTokens": "tok-1,tok-2" }),
            ),
            _ => Reply::json(200, json!({ "name": OBJECT, "downloadTokens": "tok-1,tok-2" })),
        }
    }

    fn storage_for(backend: &FakeBackend) -> FirebaseBlobStorage {
        FirebaseBlobStorage::new(Client::new(), &format!("{}/v0", backend.base_url), "bucket")
            .unwrap()
            .with_id_token(Some("id-token".into()))
            .with_chunk_size(4)
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_upload_in_chunks_and_report_progress() {
        let backend = FakeBackend::start(resumable_backend).await;
        let file = UploadFile::new("ktp.jpg", b"0123456789".to_vec()).with_content_type("image/jpeg");
        let seen = Mutex::new(Vec::new());
        let callback = |percent: f64, _: &UploadSnapshot| seen.lock().unwrap().push(percent);

        let snapshot = storage_for(&backend)
            .upload(OBJECT, &file, Some(&callback))
            .await
            .unwrap();

        assert_eq!(snapshot.state, UploadState::Success);
        assert_eq!(snapshot.bytes_transferred, 10);
        assert_eq!(*seen.lock().unwrap(), vec![40.0, 80.0, 100.0]);

        let requests = backend.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].path, "/v0/b/bucket/o");
        assert_eq!(
            requests[0].query.as_deref(),
            Some(format!("name={ENCODED_OBJECT}&uploadType=resumable").as_str())
        );
        assert_eq!(requests[0].header("x-goog-upload-header-content-type"), Some("image/jpeg".into()));
        assert_eq!(requests[0].header("authorization"), Some("Firebase id-token".into()));
        let offsets: Vec<Option<String>> = requests[1..]
            .iter()
            .map(|r| r.header("x-goog-upload-offset"))
            .collect();
        assert_eq!(offsets, vec![Some("0".into()), Some("4".into()), Some("8".into())]);
        assert_eq!(requests[3].header("x-goog-upload-command"), Some("upload, finalize".into()));
        assert_eq!(requests[3].body, b"89".to_vec());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_finalize_an_empty_file_in_one_request() {
        let backend = FakeBackend::start(resumable_backend).await;
        let snapshot = storage_for(&backend)
            .upload(OBJECT, &UploadFile::new("empty.txt", Vec::new()), None)
            .await
            .unwrap();
        assert_eq!(snapshot.state, UploadState::Success);
        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].header("x-goog-upload-command"), Some("upload, finalize".into()));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_when_the_session_url_is_missing() {
        let backend = FakeBackend::start(|_| Reply::status(200)).await;
        let result = storage_for(&backend)
            .upload(OBJECT, &UploadFile::new("ktp.jpg", b"x".to_vec()), None)
            .await;
        assert!(matches!(result, Err(BlobStorageError::Protocol(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_propagate_a_rejected_chunk() {
        let backend = FakeBackend::start(|request| {
            match request.header("x-goog-upload-command").as_deref() {
                Some("start") => resumable_backend(request),
                _ => Reply::json(403, json!({ "error": { "code": 403, "message": "Permission denied." } })),
            }
        })
        .await;
        let result = storage_for(&backend)
            .upload(OBJECT, &UploadFile::new("ktp.jpg", b"0123456789".to_vec()), None)
            .await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("403"));
        assert!(message.contains("Permission denied."));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_build_the_download_url_from_the_first_token() {
        let backend = FakeBackend::start(resumable_backend).await;
        let url = storage_for(&backend).download_url(OBJECT).await.unwrap();
        assert_eq!(
            url,
            format!("{}/v0/b/bucket/o/{ENCODED_OBJECT}?alt=media&token=tok-1", backend.base_url)
        );
        assert_eq!(backend.requests()[0].path, format!("/v0/b/bucket/o/{ENCODED_OBJECT}"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_without_a_download_token() {
        let backend = FakeBackend::start(|_| Reply::json(200, json!({ "name": OBJECT }))).await;
        let result = storage_for(&backend).download_url(OBJECT).await;
        assert!(matches!(result, Err(BlobStorageError::NoDownloadToken(path)) if path == OBJECT));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_a_missing_object() {
        let backend = FakeBackend::start(|_| Reply::status(404)).await;
        let result = storage_for(&backend).download_url(OBJECT).await;
        assert!(matches!(result, Err(BlobStorageError::NotFound(_))));
    }
}
