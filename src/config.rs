use crate::shared::infrastructure::blob_storage::firebase_storage::{
    CHUNK_GRANULARITY, DEFAULT_STORAGE_BASE_URL,
};
use crate::shared::infrastructure::document_store::firestore::DEFAULT_FIRESTORE_BASE_URL;
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub storage_bucket: String,
    pub api_key: Option<String>,
    pub id_token: Option<String>,
    pub firestore_base_url: String,
    pub storage_base_url: String,
    pub upload_chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupwareConfig {
    pub base_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
    pub groupware: GroupwareConfig,
}

impl AppConfig {
    /// Reads `.env` when present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));

        let upload_chunk_size = match optional("UPLOAD_CHUNK_SIZE") {
            Some(raw) => parse_chunk_size(&raw)?,
            None => CHUNK_GRANULARITY,
        };

        Ok(Self {
            firebase: FirebaseConfig {
                project_id: required("FIREBASE_PROJECT_ID")?,
                storage_bucket: required("FIREBASE_STORAGE_BUCKET")?,
                api_key: optional("FIREBASE_API_KEY"),
                id_token: optional("FIREBASE_ID_TOKEN"),
                firestore_base_url: optional("FIRESTORE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.to_string()),
                storage_base_url: optional("FIREBASE_STORAGE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_STORAGE_BASE_URL.to_string()),
                upload_chunk_size,
            },
            groupware: GroupwareConfig {
                base_url: required("GROUPWARE_API_URL")?,
                token: optional("GROUPWARE_API_TOKEN"),
            },
        })
    }
}

fn parse_chunk_size(raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "UPLOAD_CHUNK_SIZE",
        reason,
    };
    let size: usize = raw
        .trim()
        .parse()
        .map_err(|error| invalid(format!("{error}")))?;
    if size == 0 || size % CHUNK_GRANULARITY != 0 {
        return Err(invalid(format!(
            "{size} is not a positive multiple of {CHUNK_GRANULARITY}"
        )));
    }
    Ok(size)
}
