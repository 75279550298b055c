use crate::error::{IndexerError, Result};
use crate::manifest::ManifestEntry;
use catalog_embeddings::Embedder;
use catalog_protocol::{Document, NewDocument};
use catalog_store::CatalogStore;
use catalog_vector_store::VectorStore;
use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Progress callback for ingestion
pub type ProgressCallback = Arc<dyn Fn(IngestProgress) + Send + Sync>;

/// Ingestion progress information
#[derive(Debug, Clone)]
pub struct IngestProgress {
    pub phase: IngestPhase,
    pub current: usize,
    pub total: usize,
    pub current_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestPhase {
    Storing,
    Embedding,
    Persisting,
    Complete,
}

/// Statistics about an ingestion or reindex run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents written to the relational store
    pub documents: usize,
    /// Distinct categories referenced
    pub categories: usize,
    /// Distinct keywords referenced
    pub keywords: usize,
    /// Documents given vectors in the index
    pub vectors_indexed: usize,
}

/// Writes catalog entries to the relational store and their title and
/// summary embeddings to the vector index.
pub struct CatalogIndexer {
    store: CatalogStore,
    vectors: VectorStore,
    embedder: Arc<dyn Embedder>,
}

impl CatalogIndexer {
    pub fn new(store: CatalogStore, vectors: VectorStore, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            vectors,
            embedder,
        }
    }

    /// Ingest manifest entries one by one. Entries are validated up front, so
    /// an invalid manifest writes nothing. The vector index is persisted once
    /// at the end.
    pub async fn ingest(
        &self,
        entries: Vec<ManifestEntry>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<IngestReport> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate(index)?;
        }

        let total = entries.len();
        info!("Ingesting {total} catalog entries");

        let categories: BTreeSet<&str> = entries.iter().map(|e| e.category.as_str()).collect();
        let keywords: BTreeSet<&str> = entries
            .iter()
            .flat_map(|e| e.keywords.iter().map(String::as_str))
            .collect();
        let mut report = IngestReport {
            categories: categories.len(),
            keywords: keywords.len(),
            ..Default::default()
        };

        for (idx, entry) in entries.into_iter().enumerate() {
            let title = entry.title.clone();
            report_progress(
                &progress_callback,
                IngestPhase::Storing,
                idx + 1,
                total,
                Some(title.clone()),
            );
            let document = self.store_entry(entry).await?;
            report.documents += 1;

            report_progress(
                &progress_callback,
                IngestPhase::Embedding,
                idx + 1,
                total,
                Some(title),
            );
            self.index_document(&document).await?;
            report.vectors_indexed += 1;
        }

        report_progress(&progress_callback, IngestPhase::Persisting, total, total, None);
        self.vectors.persist().await?;
        report_progress(&progress_callback, IngestPhase::Complete, total, total, None);

        info!(
            "Ingestion complete: {} documents, {} categories, {} keywords",
            report.documents, report.categories, report.keywords
        );
        Ok(report)
    }

    /// Rebuild the vector index from every stored document
    pub async fn reindex(&self, progress_callback: Option<ProgressCallback>) -> Result<IngestReport> {
        let store = self.store.clone();
        let documents = tokio::task::spawn_blocking(move || store.all_documents()).await??;
        let total = documents.len();
        info!("Reindexing {total} documents");

        self.vectors.clear().await;
        let mut report = IngestReport {
            documents: total,
            ..Default::default()
        };
        let mut categories = BTreeSet::new();
        let mut keywords = BTreeSet::new();

        for (idx, document) in documents.iter().enumerate() {
            report_progress(
                &progress_callback,
                IngestPhase::Embedding,
                idx + 1,
                total,
                Some(document.title.clone()),
            );
            self.index_document(document).await?;
            categories.insert(document.category_id);
            keywords.extend(document.keyword_ids.iter().copied());
            report.vectors_indexed += 1;
        }
        report.categories = categories.len();
        report.keywords = keywords.len();

        report_progress(&progress_callback, IngestPhase::Persisting, total, total, None);
        self.vectors.persist().await?;
        report_progress(&progress_callback, IngestPhase::Complete, total, total, None);

        info!("Reindex complete: {} documents", report.vectors_indexed);
        Ok(report)
    }

    async fn store_entry(&self, entry: ManifestEntry) -> Result<Document> {
        let store = self.store.clone();
        let document = tokio::task::spawn_blocking(move || {
            let category = store.create_category(&entry.category)?;
            let keyword_ids = entry
                .keywords
                .iter()
                .map(|name| store.create_keyword(name).map(|k| k.id))
                .collect::<catalog_store::Result<Vec<_>>>()?;

            store.create_document(
                &NewDocument::new(entry.title, entry.summary, entry.link, category.id)
                    .with_keywords(keyword_ids),
            )
        })
        .await??;

        debug!("Stored document {} '{}'", document.id, document.title);
        Ok(document)
    }

    async fn index_document(&self, document: &Document) -> Result<()> {
        let texts = vec![document.title.clone(), document.summary.clone()];
        let vectors = self.embedder.embed_batch(texts).await?;
        if vectors.len() != 2 {
            return Err(IndexerError::Embedding(
                catalog_embeddings::EmbeddingError::EmbeddingGeneration(format!(
                    "expected 2 embeddings for document {}, got {}",
                    document.id,
                    vectors.len()
                )),
            ));
        }

        self.vectors.upsert(document.id, vectors).await?;
        Ok(())
    }
}

fn report_progress(
    callback: &Option<ProgressCallback>,
    phase: IngestPhase,
    current: usize,
    total: usize,
    current_title: Option<String>,
) {
    if let Some(cb) = callback {
        cb(IngestProgress {
            phase,
            current,
            total,
            current_title,
        });
    }
}
