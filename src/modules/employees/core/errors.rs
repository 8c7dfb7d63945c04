use crate::shared::infrastructure::blob_storage::BlobStorageError;
use crate::shared::infrastructure::document_store::DocumentStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{caller}: id must be supplied")]
    MissingId { caller: &'static str },

    #[error("updateUserProfileDetail: updating is only allowed for these keys -> {allowed}")]
    DisallowedSection { key: String, allowed: String },

    #[error("upsertUserDocument: document type must be one of {allowed}")]
    DisallowedDocumentType { document_type: String, allowed: String },

    #[error(transparent)]
    DocumentStore(#[from] DocumentStoreError),

    #[error(transparent)]
    BlobStorage(#[from] BlobStorageError),
}
