use crate::shared::core::primitives::{UploadFile, UserId};
use crate::shared::core::registry::{DocumentType, StorageFolder};

/// `employee_documents/{user_id}`
pub fn employee_storage_folder(user_id: &UserId) -> String {
    format!("{}/{}", StorageFolder::EmployeeDocuments, user_id)
}

/// `employee_documents/{user_id}/{document_type}-{user_id}.{extension}`
///
/// The same user and type always land on the same path, so a re-upload replaces the previous file.
pub fn employee_document_path(user_id: &UserId, document_type: DocumentType, file: &UploadFile) -> String {
    format!(
        "{}/{}-{}.{}",
        employee_storage_folder(user_id),
        document_type,
        user_id,
        file.extension()
    )
}
