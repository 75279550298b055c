use catalog_protocol::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] catalog_embeddings::EmbeddingError),

    #[error("Vector index error: {0}")]
    Index(#[from] catalog_vector_store::VectorStoreError),

    #[error("Store error: {0}")]
    Store(#[from] catalog_store::StoreError),

    #[error("Invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit { limit: usize, max: usize },

    #[error("Invalid retrieval config: {0}")]
    InvalidConfig(String),
}

impl RetrievalError {
    /// Failure category reported to callers next to the message
    pub fn kind(&self) -> ErrorKind {
        match self {
            RetrievalError::Embedding(_) => ErrorKind::EmbeddingFailure,
            RetrievalError::Index(_) => ErrorKind::IndexFailure,
            RetrievalError::Store(_) => ErrorKind::StoreFailure,
            RetrievalError::InvalidLimit { .. } => ErrorKind::InvalidLimit,
            RetrievalError::InvalidConfig(_) => ErrorKind::InvalidRequest,
        }
    }
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
