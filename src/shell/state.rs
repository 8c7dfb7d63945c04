use crate::config::AppConfig;
use crate::modules::checkins::store::CheckinsListStore;
use crate::modules::dashboard::store::DashboardStore;
use crate::modules::employees::use_cases::get_user_by_id::handler::GetUserByIdHandler;
use crate::modules::employees::use_cases::upsert_user_document::handler::UpsertUserDocumentHandler;
use crate::modules::employees::use_cases::upsert_user_profile_detail::handler::UpsertUserProfileDetailHandler;
use crate::shared::infrastructure::blob_storage::firebase_storage::FirebaseBlobStorage;
use crate::shared::infrastructure::blob_storage::{BlobStorage, BlobStorageError};
use crate::shared::infrastructure::document_store::firestore::FirestoreDocumentStore;
use crate::shared::infrastructure::document_store::{DocumentStore, DocumentStoreError};
use crate::shared::infrastructure::groupware_api::GroupwareApi;
use crate::shared::infrastructure::groupware_api::http::HttpGroupwareApi;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    DocumentStore(#[from] DocumentStoreError),

    #[error(transparent)]
    BlobStorage(#[from] BlobStorageError),
}

#[derive(Clone)]
pub struct AppState {
    pub get_user_by_id: Arc<GetUserByIdHandler<dyn DocumentStore>>,
    pub upsert_user_profile_detail: Arc<UpsertUserProfileDetailHandler<dyn DocumentStore>>,
    pub upsert_user_document: Arc<UpsertUserDocumentHandler<dyn BlobStorage>>,
    pub checkins: Arc<CheckinsListStore<dyn DocumentStore>>,
    pub dashboard: Arc<DashboardStore<dyn GroupwareApi>>,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        storage: Arc<dyn BlobStorage>,
        groupware: Arc<dyn GroupwareApi>,
    ) -> Self {
        Self {
            get_user_by_id: Arc::new(GetUserByIdHandler::new(documents.clone())),
            upsert_user_profile_detail: Arc::new(UpsertUserProfileDetailHandler::new(
                documents.clone(),
            )),
            upsert_user_document: Arc::new(UpsertUserDocumentHandler::new(storage)),
            checkins: Arc::new(CheckinsListStore::new(documents)),
            dashboard: Arc::new(DashboardStore::new(groupware)),
        }
    }

    /// Wires the REST adapters over one shared HTTP client.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let client = Client::new();
        let firebase = &config.firebase;

        let documents = FirestoreDocumentStore::new(
            client.clone(),
            &firebase.firestore_base_url,
            &firebase.project_id,
        )?
        .with_api_key(firebase.api_key.clone())
        .with_id_token(firebase.id_token.clone());

        let storage = FirebaseBlobStorage::new(
            client.clone(),
            &firebase.storage_base_url,
            &firebase.storage_bucket,
        )?
        .with_id_token(firebase.id_token.clone())
        .with_chunk_size(firebase.upload_chunk_size);

        let groupware = HttpGroupwareApi::new(client, config.groupware.base_url.as_str())
            .with_token(config.groupware.token.clone());

        Ok(Self::new(
            Arc::new(documents),
            Arc::new(storage),
            Arc::new(groupware),
        ))
    }
}
