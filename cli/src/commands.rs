use crate::config::CatalogConfig;
use crate::config::EmbedderBackend;
use anyhow::Context;
use anyhow::Result;
use catalog_embeddings::Embedder;
use catalog_embeddings::EmbeddingService;
use catalog_embeddings::HashingEmbedder;
use catalog_indexer::CatalogIndexer;
use catalog_indexer::IngestPhase;
use catalog_indexer::IngestProgress;
use catalog_indexer::ProgressCallback;
use catalog_indexer::load_manifest;
use catalog_retrieval::HybridRetrieval;
use catalog_retrieval::SearchSource;
use catalog_server::AppState;
use catalog_store::CatalogStore;
use catalog_vector_store::VectorStore;
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

async fn build_embedder(config: &CatalogConfig) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.embedder {
        EmbedderBackend::Fastembed => Arc::new(
            EmbeddingService::with_config(config.embedding.clone())
                .await
                .context("Failed to initialize embedding model")?,
        ),
        EmbedderBackend::Hashing => Arc::new(HashingEmbedder::new(config.embedding.dimension)?),
    };
    Ok(embedder)
}

fn open_store(config: &CatalogConfig) -> Result<CatalogStore> {
    CatalogStore::open(&config.store).with_context(|| {
        format!(
            "Failed to open catalog database {}",
            config.store.path.display()
        )
    })
}

async fn open_vectors(config: &CatalogConfig) -> Result<VectorStore> {
    VectorStore::open(&config.vector_store)
        .await
        .context("Failed to load vector store")
}

async fn build_retrieval(
    config: &CatalogConfig,
    store: &CatalogStore,
) -> Result<HybridRetrieval> {
    let vectors = open_vectors(config).await?;
    let embedder = build_embedder(config).await?;
    HybridRetrieval::new(
        config.retrieval.clone(),
        embedder,
        Arc::new(vectors),
        Arc::new(store.clone()),
    )
    .context("Failed to initialize retrieval engine")
}

pub(crate) async fn run_serve(config: &CatalogConfig) -> Result<()> {
    let store = open_store(config)?;
    let retrieval = build_retrieval(config, &store).await?;
    let state = AppState::new(Arc::new(retrieval), store, &config.server)?;

    info!("starting catalog server on {}", config.server.bind_addr);
    catalog_server::run_server(config.server.clone(), state).await
}

pub(crate) async fn run_ingest(
    config: &CatalogConfig,
    manifest: Option<&Path>,
    reindex: bool,
) -> Result<()> {
    let store = open_store(config)?;
    let vectors = open_vectors(config).await?;
    let embedder = build_embedder(config).await?;
    let indexer = CatalogIndexer::new(store, vectors, embedder);

    let progress: ProgressCallback = Arc::new(|progress: IngestProgress| {
        if progress.phase == IngestPhase::Embedding {
            info!(
                "[{}/{}] {}",
                progress.current,
                progress.total,
                progress.current_title.unwrap_or_default()
            );
        }
    });

    if let Some(manifest) = manifest {
        println!(
            "{} Ingesting {}",
            "▶".bright_blue(),
            manifest.display()
        );
        let entries = load_manifest(manifest)
            .await
            .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
        let report = indexer
            .ingest(entries, Some(Arc::clone(&progress)))
            .await
            .context("Failed to ingest manifest")?;

        println!("\n{} Ingestion complete!", "✓".bright_green());
        println!("  Documents: {}", report.documents.bright_cyan());
        println!("  Categories: {}", report.categories.bright_cyan());
        println!("  Keywords: {}", report.keywords.bright_cyan());
    }

    if reindex {
        println!("{} Rebuilding vector index", "▶".bright_blue());
        let report = indexer
            .reindex(Some(progress))
            .await
            .context("Failed to rebuild vector index")?;
        println!(
            "{} Reindexed {} documents",
            "✓".bright_green(),
            report.vectors_indexed.bright_cyan()
        );
    }

    Ok(())
}

pub(crate) async fn run_search(config: &CatalogConfig, query: &str, limit: usize) -> Result<()> {
    let store = open_store(config)?;
    let retrieval = build_retrieval(config, &store).await?;

    let results = retrieval.search(query, limit).await.context("Search failed")?;

    if results.is_empty() {
        println!("{} No results found", "✗".bright_red());
        return Ok(());
    }

    println!(
        "{} Found {} results in {}ms\n",
        "✓".bright_green(),
        results.len().to_string().bright_cyan(),
        results.stats.total_time_ms.to_string().bright_cyan()
    );

    for result in &results.results {
        let source = match result.source {
            SearchSource::Semantic => "semantic".bright_magenta().to_string(),
            SearchSource::Textual => "textual".bright_yellow().to_string(),
        };
        println!(
            "{}. {} [{}]",
            (result.rank + 1).to_string().bright_yellow(),
            result.document.title.bright_cyan(),
            source
        );
        println!("   {}", result.document.link.bright_black());
        if !result.document.summary.is_empty() {
            println!("   {}", result.document.summary.dimmed());
        }
        println!();
    }

    println!(
        "{} semantic {}ms ({} ids), textual {}ms ({} ids), hydrate {}ms",
        "Stats:".bright_black(),
        results.stats.semantic_time_ms,
        results.stats.semantic_count,
        results.stats.textual_time_ms,
        results.stats.textual_count,
        results.stats.hydrate_time_ms
    );

    Ok(())
}

pub(crate) fn run_categories(config: &CatalogConfig) -> Result<()> {
    let store = open_store(config)?;
    let categories = store.get_categories()?;

    if categories.is_empty() {
        println!("{} No categories yet", "✗".bright_red());
        return Ok(());
    }

    for category in categories {
        let count = store.get_documents_by_category(category.id)?.len();
        println!(
            "{:>4}  {} {}",
            category.id.to_string().bright_black(),
            category.name.bright_cyan(),
            format!("({count} documents)").dimmed()
        );
    }
    Ok(())
}
