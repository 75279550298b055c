use crate::error::Result;
use crate::tokenizer::tokenize;
use catalog_protocol::DocumentId;
use catalog_store::DocumentStore;
use log::debug;
use std::sync::Arc;

/// Substring matching over title, summary and keyword names
pub struct TextualMatcher {
    store: Arc<dyn DocumentStore>,
}

impl TextualMatcher {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Ids of documents matching any token of `query` in any field. A blank
    /// query matches nothing and never reaches the store.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<DocumentId>> {
        let tokens = tokenize(query);
        if tokens.is_empty() || limit == 0 {
            debug!("Textual search skipped for blank query");
            return Ok(Vec::new());
        }

        let ids = self.store.search_textual(&tokens, limit).await?;
        debug!("Textual search for {tokens:?} found {} ids", ids.len());
        Ok(ids)
    }
}
