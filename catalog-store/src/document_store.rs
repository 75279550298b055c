use crate::error::Result;
use crate::store::CatalogStore;
use async_trait::async_trait;
use catalog_protocol::{Document, DocumentId};

/// Read side of the relational store used by retrieval.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Identifiers of documents whose title, summary or any keyword name
    /// contains at least one of `tokens` (case-insensitive, literal), at most
    /// `limit` of them, each at most once.
    async fn search_textual(&self, tokens: &[String], limit: usize) -> Result<Vec<DocumentId>>;

    /// Documents for `ids` in unspecified order. Unknown ids are skipped.
    async fn fetch_by_ids(&self, ids: &[DocumentId]) -> Result<Vec<Document>>;
}

#[async_trait]
impl DocumentStore for CatalogStore {
    async fn search_textual(&self, tokens: &[String], limit: usize) -> Result<Vec<DocumentId>> {
        let store = self.clone();
        let tokens = tokens.to_vec();
        tokio::task::spawn_blocking(move || store.search_documents_textual(&tokens, limit)).await?
    }

    async fn fetch_by_ids(&self, ids: &[DocumentId]) -> Result<Vec<Document>> {
        let store = self.clone();
        let ids = ids.to_vec();
        tokio::task::spawn_blocking(move || store.get_documents_by_ids(&ids)).await?
    }
}
