use crate::modules::employees::core::errors::AccessError;
use crate::shared::core::primitives::{Document, UserId};
use crate::shared::core::registry::Collection;
use crate::shared::infrastructure::document_store::{DocumentPath, DocumentStore};
use std::sync::Arc;

pub struct GetUserByIdHandler<TDocumentStore>
where
    TDocumentStore: DocumentStore + ?Sized,
{
    documents: Arc<TDocumentStore>,
}

impl<TDocumentStore> GetUserByIdHandler<TDocumentStore>
where
    TDocumentStore: DocumentStore + ?Sized,
{
    pub fn new(documents: Arc<TDocumentStore>) -> Self {
        Self { documents }
    }

    /// The user record, or `None` when no such user exists.
    #[tracing::instrument(skip(self, id), fields(user_id = %id))]
    pub async fn handle(&self, id: &UserId) -> Result<Option<Document>, AccessError> {
        if id.is_missing() {
            return Err(AccessError::MissingId {
                caller: "getUserById",
            });
        }
        let path = DocumentPath::collection(Collection::Users).doc(id.as_str());
        Ok(self.documents.get(&path).await?)
    }
}
