// Partial update of a user's profile sections.
//
// Responsibilities
// - Refuse to run without a user id.
// - Treat a missing payload as nothing to do.
// - Validate every top-level key before touching the backend, then merge-update only those keys.

use crate::modules::employees::core::errors::AccessError;
use crate::modules::employees::core::profile_detail::ProfileDetailPatch;
use crate::shared::core::primitives::{Document, UpsertOutcome, UserId};
use crate::shared::core::registry::Collection;
use crate::shared::infrastructure::document_store::{DocumentPath, DocumentStore};
use std::sync::Arc;
use tracing::debug;

pub struct UpsertUserProfileDetailHandler<TDocumentStore>
where
    TDocumentStore: DocumentStore + ?Sized,
{
    documents: Arc<TDocumentStore>,
}

impl<TDocumentStore> UpsertUserProfileDetailHandler<TDocumentStore>
where
    TDocumentStore: DocumentStore + ?Sized,
{
    pub fn new(documents: Arc<TDocumentStore>) -> Self {
        Self { documents }
    }

    #[tracing::instrument(skip(self, user_id, data), fields(user_id = %user_id))]
    pub async fn handle(
        &self,
        user_id: &UserId,
        data: Option<Document>,
    ) -> Result<UpsertOutcome<()>, AccessError> {
        if user_id.is_missing() {
            return Err(AccessError::MissingId {
                caller: "updateUserPersonalData",
            });
        }
        let Some(data) = data else {
            debug!("no profile detail supplied");
            return Ok(UpsertOutcome::Noop);
        };

        let patch = ProfileDetailPatch::try_from(data)?;
        debug!(sections = ?patch.sections(), "updating profile detail");
        let path = DocumentPath::collection(Collection::Users).doc(user_id.as_str());
        self.documents.update(&path, patch.into_fields()).await?;
        Ok(UpsertOutcome::Applied(()))
    }
}

#[cfg(test)]
mod upsert_user_profile_detail_handler_tests {
    use super::*;
    use crate::shared::infrastructure::document_store::DocumentStoreError;
    use crate::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
    use crate::tests::fixtures::documents::{make_document, make_user};
    use rstest::{fixture, rstest};
    use serde_json::json;

    type BeforeEachReturn = (UserId, DocumentPath, Arc<InMemoryDocumentStore>);

    #[fixture]
    fn before_each() -> BeforeEachReturn {
        let user_id = UserId::from("u1");
        let path = DocumentPath::collection(Collection::Users).doc("u1");
        (user_id, path, Arc::new(InMemoryDocumentStore::new()))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_missing_user_id(before_each: BeforeEachReturn) {
        let (_, _, store) = before_each;
        let handler = UpsertUserProfileDetailHandler::new(store.clone());
        let result = handler
            .handle(&UserId::default(), Some(make_document(json!({ "personal": {} }))))
            .await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "updateUserPersonalData: id must be supplied"
        );
        assert_eq!(store.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_numeric_zero_user_id(before_each: BeforeEachReturn) {
        let (_, _, store) = before_each;
        let handler = UpsertUserProfileDetailHandler::new(store.clone());
        let result = handler
            .handle(&UserId::from(0i64), Some(make_document(json!({ "personal": {} }))))
            .await;
        assert!(matches!(
            result,
            Err(AccessError::MissingId { caller: "updateUserPersonalData" })
        ));
        assert_eq!(store.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_noop_without_data(before_each: BeforeEachReturn) {
        let (user_id, _, store) = before_each;
        let handler = UpsertUserProfileDetailHandler::new(store.clone());
        let outcome = handler.handle(&user_id, None).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Noop);
        assert_eq!(store.calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_foreign_key_without_writing(before_each: BeforeEachReturn) {
        let (user_id, path, store) = before_each;
        store.insert(&path, make_user()).await;
        let handler = UpsertUserProfileDetailHandler::new(store.clone());

        let result = handler
            .handle(
                &user_id,
                Some(make_document(json!({ "personal": { "full_name": "X" }, "foo": 1 }))),
            )
            .await;

        assert!(matches!(result, Err(AccessError::DisallowedSection { key, .. }) if key == "foo"));
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get(&path).await.unwrap(), Some(make_user()));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_merge_the_given_sections(before_each: BeforeEachReturn) {
        let (user_id, path, store) = before_each;
        store.insert(&path, make_user()).await;
        let handler = UpsertUserProfileDetailHandler::new(store.clone());
        let bank_account = json!({ "bank": "BCA", "number": "0123456789" });

        let outcome = handler
            .handle(&user_id, Some(make_document(json!({ "bank_account": bank_account.clone() }))))
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Applied(()));
        let stored = store.get(&path).await.unwrap().unwrap();
        assert_eq!(stored["bank_account"], bank_account);
        assert_eq!(stored["personal"], make_user()["personal"]);
        assert_eq!(stored["email"], make_user()["email"]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_propagate_a_missing_user_record(before_each: BeforeEachReturn) {
        let (user_id, _, store) = before_each;
        let handler = UpsertUserProfileDetailHandler::new(store);
        let result = handler
            .handle(&user_id, Some(make_document(json!({ "education": [] }))))
            .await;
        assert!(matches!(
            result,
            Err(AccessError::DocumentStore(DocumentStoreError::NotFound(_)))
        ));
    }
}
