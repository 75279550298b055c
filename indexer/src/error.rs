use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] catalog_store::StoreError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] catalog_embeddings::EmbeddingError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] catalog_vector_store::VectorStoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid manifest entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("Ingestion task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for IndexerError {
    fn from(err: tokio::task::JoinError) -> Self {
        IndexerError::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IndexerError>;
