use catalog_embeddings::HashingEmbedder;
use catalog_indexer::{
    CatalogIndexer, IndexerError, IngestPhase, IngestProgress, IngestReport, ManifestEntry,
    ProgressCallback,
};
use catalog_store::CatalogStore;
use catalog_vector_store::{VectorStore, VectorStoreConfig};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const DIMENSION: usize = 32;

fn entry(title: &str, category: &str, keywords: &[&str]) -> ManifestEntry {
    ManifestEntry {
        title: title.to_string(),
        summary: format!("About {title}"),
        link: format!("https://example.org/{}", title.to_lowercase()),
        category: category.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn manifest() -> Vec<ManifestEntry> {
    vec![
        entry("Rome", "History", &["empire", "war"]),
        entry("Carthage", "History", &["war"]),
        entry("Atoms", "Science", &[]),
    ]
}

#[tokio::test]
async fn test_ingest_writes_store_and_index() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = VectorStoreConfig {
        path: dir.path().join("vectors.json"),
        dimension: DIMENSION,
    };
    let store = CatalogStore::open_in_memory()?;
    let vectors = VectorStore::open(&config).await?;
    let indexer = CatalogIndexer::new(
        store.clone(),
        vectors.clone(),
        Arc::new(HashingEmbedder::new(DIMENSION)?),
    );

    let phases = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&phases);
    let callback: ProgressCallback = Arc::new(move |progress: IngestProgress| {
        seen.lock().unwrap().push(progress.phase);
    });

    let report = indexer.ingest(manifest(), Some(callback)).await?;
    assert_eq!(
        report,
        IngestReport {
            documents: 3,
            categories: 2,
            keywords: 2,
            vectors_indexed: 3,
        }
    );

    assert_eq!(store.count_documents()?, 3);
    assert_eq!(store.get_categories()?.len(), 2);
    let war = store.get_keyword_by_name("war")?.map(|k| k.id);
    let rome = &store.all_documents()?[0];
    assert!(war.is_some_and(|id| rome.keyword_ids.contains(&id)));

    assert_eq!(vectors.count().await, 3);
    let reopened = VectorStore::open(&config).await?;
    assert_eq!(reopened.count().await, 3);

    let phases = phases.lock().unwrap().clone();
    assert_eq!(phases.first(), Some(&IngestPhase::Storing));
    assert_eq!(phases.last(), Some(&IngestPhase::Complete));
    Ok(())
}

#[tokio::test]
async fn test_invalid_entry_writes_nothing() -> anyhow::Result<()> {
    let store = CatalogStore::open_in_memory()?;
    let indexer = CatalogIndexer::new(
        store.clone(),
        VectorStore::in_memory(DIMENSION),
        Arc::new(HashingEmbedder::new(DIMENSION)?),
    );

    let mut entries = manifest();
    entries[2].link = String::new();

    let err = indexer.ingest(entries, None).await.unwrap_err();
    assert!(matches!(err, IndexerError::InvalidEntry { index: 2, .. }));
    assert_eq!(store.count_documents()?, 0);
    Ok(())
}

#[tokio::test]
async fn test_reindex_rebuilds_vectors() -> anyhow::Result<()> {
    let store = CatalogStore::open_in_memory()?;
    let vectors = VectorStore::in_memory(DIMENSION);
    let indexer = CatalogIndexer::new(
        store.clone(),
        vectors.clone(),
        Arc::new(HashingEmbedder::new(DIMENSION)?),
    );
    indexer.ingest(manifest(), None).await?;

    vectors.clear().await;
    assert_eq!(vectors.count().await, 0);

    let report = indexer.reindex(None).await?;
    assert_eq!(report.documents, 3);
    assert_eq!(report.vectors_indexed, 3);
    assert_eq!(report.categories, 2);
    assert_eq!(report.keywords, 2);
    assert_eq!(vectors.count().await, 3);
    Ok(())
}
