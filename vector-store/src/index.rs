use crate::error::VectorStoreError;
use async_trait::async_trait;
use catalog_protocol::DocumentId;

/// Nearest-neighbour lookup over document embeddings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Identifiers of at most `k` documents, most similar first. No
    /// identifier appears twice.
    async fn similarity_search(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<DocumentId>, VectorStoreError>;
}
