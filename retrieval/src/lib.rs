/*!
# Catalog Retrieval

Hybrid retrieval over the document catalog, combining:
- **Semantic search**: the query is embedded and the vector index returns the
  nearest documents
- **Textual search**: case-insensitive substring matching of every query token
  against titles, summaries and keyword names
- **Priority merge**: semantic ids first, then textual ids not seen yet, cut
  to the requested limit
- **Hydration**: one batch fetch from the relational store, re-emitted in
  merged order

## Architecture

```text
Query
  ├─> Semantic Matcher (Embedder + VectorIndex)
  │     └─> top-k ids
  ├─> Textual Matcher (Tokenizer + DocumentStore)
  │     └─> matching ids
  └─> Merge (semantic first, dedup, truncate)
        └─> Hydrate (DocumentStore::fetch_by_ids)
              └─> ordered documents
```

Both matchers run concurrently. Either one failing fails the query; there are
no partial results and no retries.

## Example

```rust,no_run
use catalog_embeddings::HashingEmbedder;
use catalog_retrieval::{HybridRetrieval, RetrievalConfig};
use catalog_store::{CatalogStore, StoreConfig};
use catalog_vector_store::{VectorStore, VectorStoreConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let store = CatalogStore::open(&StoreConfig::default())?;
    let vectors = VectorStore::open(&VectorStoreConfig::default()).await?;
    let embedder = HashingEmbedder::new(vectors.dimension())?;

    let retrieval = HybridRetrieval::new(
        RetrievalConfig::default(),
        Arc::new(embedder),
        Arc::new(vectors),
        Arc::new(store),
    )?;
    let results = retrieval.search("nguyen dynasty", 10).await?;

    for (i, result) in results.top(5).iter().enumerate() {
        println!("{}. {} ({:?})", i + 1, result.document.title, result.source);
    }

    Ok(())
}
```
*/

mod config;
mod error;
mod hydrate;
mod merge;
mod result;
mod retrieval;
mod semantic;
mod textual;
mod tokenizer;

pub use config::RetrievalConfig;
pub use error::{Result, RetrievalError};
pub use hydrate::{Hydrator, restore_order};
pub use merge::{merge, merge_ranked};
pub use result::{SearchResult, SearchResults, SearchSource, SearchStats};
pub use retrieval::HybridRetrieval;
pub use semantic::SemanticMatcher;
pub use textual::TextualMatcher;
pub use tokenizer::tokenize;
