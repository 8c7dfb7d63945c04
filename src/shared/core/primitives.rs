use serde::{Deserialize, Serialize};
use std::fmt;

/// A document as the backend stores it: top-level field names to JSON values.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Identifier of a user record. Numeric identifiers are kept in their decimal form,
/// except `0`, which counts as no identifier at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        match id {
            0 => Self::default(),
            id => Self(id.to_string()),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        match id {
            0 => Self::default(),
            id => Self(id.to_string()),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Everything after the last `.` of the name, or the whole name when it has none.
    pub fn extension(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => &self.name,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of a write that may legitimately have had nothing to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome<T> {
    Noop,
    Applied(T),
}

impl<T> UpsertOutcome<T> {
    pub fn is_noop(&self) -> bool {
        matches!(self, UpsertOutcome::Noop)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            UpsertOutcome::Noop => None,
            UpsertOutcome::Applied(value) => Some(value),
        }
    }
}
