use catalog_protocol::{CategoryId, DocumentId, KeywordId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("Category {0} not found")]
    CategoryNotFound(CategoryId),

    #[error("Keywords not found: {0:?}")]
    KeywordsNotFound(Vec<KeywordId>),

    #[error("Document {0} not found")]
    DocumentNotFound(DocumentId),

    #[error("Store task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
