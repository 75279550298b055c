use crate::error::Result;
use catalog_embeddings::Embedder;
use catalog_protocol::DocumentId;
use catalog_vector_store::VectorIndex;
use log::debug;
use std::sync::Arc;

/// Embeds the query and asks the vector index for its nearest documents.
/// Ordering comes from the index.
pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl SemanticMatcher {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// At most `k` ids, most similar first
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<DocumentId>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(query).await?;
        let mut ids = self.index.similarity_search(&vector, k).await?;
        ids.truncate(k);

        debug!("Semantic search found {} ids (k = {k})", ids.len());
        Ok(ids)
    }
}
