use serde_json::Value;
use thiserror::Error;

use crate::services::storage::{StorageError, StorageService};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Transcript not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Transcript is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Transcript is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<StorageError> for RetrievalError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => RetrievalError::NotFound(key),
            other => RetrievalError::Storage(other),
        }
    }
}

impl RetrievalError {
    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalError::NotFound(_) => "not_found",
            RetrievalError::Storage(_) => "storage",
            RetrievalError::Encoding(_) | RetrievalError::Parse(_) => "malformed",
        }
    }
}

/// Reads a stored JSON object in full and parses it.
pub async fn fetch_json(store: &dyn StorageService, key: &str) -> Result<Value, RetrievalError> {
    let bytes = store.get_file(key).await?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}
