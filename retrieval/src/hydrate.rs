use crate::error::Result;
use catalog_protocol::{Document, DocumentId};
use catalog_store::DocumentStore;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves merged ids into full documents without changing their order
pub struct Hydrator {
    store: Arc<dyn DocumentStore>,
}

impl Hydrator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// One batch fetch, then the records come back in the order of `ids`.
    /// Ids the store no longer knows are skipped.
    pub async fn hydrate(&self, ids: &[DocumentId]) -> Result<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.store.fetch_by_ids(ids).await?;
        let documents = restore_order(ids, records);
        if documents.len() < ids.len() {
            debug!(
                "Hydration skipped {} ids missing from the store",
                ids.len() - documents.len()
            );
        }
        Ok(documents)
    }
}

/// Reorder `records` to follow `ids`, dropping ids without a record
pub fn restore_order(ids: &[DocumentId], records: Vec<Document>) -> Vec<Document> {
    let mut by_id: HashMap<DocumentId, Document> =
        records.into_iter().map(|doc| (doc.id, doc)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
