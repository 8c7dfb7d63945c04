// Upload of an employee identity document.
//
// Responsibilities
// - Refuse to run without a user id; treat a missing file as nothing to do.
// - Accept only the known document types.
// - Upload to the deterministic path and resolve the public download URL.

use crate::modules::employees::core::document_path::employee_document_path;
use crate::modules::employees::core::errors::AccessError;
use crate::shared::core::primitives::{UploadFile, UpsertOutcome, UserId};
use crate::shared::core::registry::{DocumentType, enumerated_values};
use crate::shared::infrastructure::blob_storage::{BlobStorage, ProgressCallback};
use std::sync::Arc;
use tracing::debug;

pub struct UpsertUserDocumentHandler<TBlobStorage>
where
    TBlobStorage: BlobStorage + ?Sized,
{
    storage: Arc<TBlobStorage>,
}

impl<TBlobStorage> UpsertUserDocumentHandler<TBlobStorage>
where
    TBlobStorage: BlobStorage + ?Sized,
{
    pub fn new(storage: Arc<TBlobStorage>) -> Self {
        Self { storage }
    }

    /// Resolves to the download URL of the uploaded file.
    #[tracing::instrument(skip(self, user_id, file, on_progress), fields(user_id = %user_id))]
    pub async fn handle(
        &self,
        user_id: &UserId,
        document_type: &str,
        file: Option<UploadFile>,
        on_progress: Option<&ProgressCallback<'_>>,
    ) -> Result<UpsertOutcome<String>, AccessError> {
        if user_id.is_missing() {
            return Err(AccessError::MissingId {
                caller: "upsertUserDocument",
            });
        }
        let Some(file) = file else {
            debug!("no file supplied");
            return Ok(UpsertOutcome::Noop);
        };
        let document_type: DocumentType = document_type.parse().map_err(|_| {
            AccessError::DisallowedDocumentType {
                document_type: document_type.to_string(),
                allowed: enumerated_values::<DocumentType>().join(", "),
            }
        })?;

        let path = employee_document_path(user_id, document_type, &file);
        let snapshot = self.storage.upload(&path, &file, on_progress).await?;
        let url = self.storage.download_url(&snapshot.path).await?;
        debug!(%path, "document uploaded");
        Ok(UpsertOutcome::Applied(url))
    }
}
