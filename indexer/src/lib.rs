/*!
# Catalog Indexer

Ingestion pipeline for the document catalog.

## Features

- **Manifest ingestion**: JSON array of `{title, summary, link, category, keywords}`
- **Get-or-create references**: categories and keywords are created on first use
- **Field embeddings**: title and summary are embedded in one batch per document
- **Reindexing**: rebuild the vector index from the relational store

## Example

```rust,no_run
use catalog_embeddings::EmbeddingService;
use catalog_indexer::{CatalogIndexer, load_manifest};
use catalog_store::{CatalogStore, StoreConfig};
use catalog_vector_store::{VectorStore, VectorStoreConfig};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let store = CatalogStore::open(&StoreConfig::default())?;
    let vectors = VectorStore::open(&VectorStoreConfig::default()).await?;
    let embedder = Arc::new(EmbeddingService::new().await?);

    let indexer = CatalogIndexer::new(store, vectors, embedder);
    let entries = load_manifest(Path::new("catalog.json")).await?;
    let report = indexer.ingest(entries, None).await?;

    println!("Ingested {} documents in {} categories",
        report.documents, report.categories);

    Ok(())
}
```
*/

mod error;
mod indexer;
mod manifest;

pub use error::{IndexerError, Result};
pub use indexer::{CatalogIndexer, IngestPhase, IngestProgress, IngestReport, ProgressCallback};
pub use manifest::{ManifestEntry, load_manifest};
