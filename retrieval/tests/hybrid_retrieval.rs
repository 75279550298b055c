use catalog_embeddings::{Embedder, HashingEmbedder};
use catalog_protocol::{DocumentId, NewDocument};
use catalog_retrieval::{HybridRetrieval, RetrievalConfig, SearchSource};
use catalog_store::CatalogStore;
use catalog_vector_store::VectorStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const DIMENSION: usize = 64;

struct Fixture {
    retrieval: HybridRetrieval,
    fox: DocumentId,
    dynasty: DocumentId,
    unrelated: DocumentId,
}

/// Real store and vector index, with the hashing embedder standing in for the
/// model. Only "Dynasty" gets vectors, so the fox document can only be
/// found textually.
async fn fixture() -> anyhow::Result<Fixture> {
    let store = CatalogStore::open_in_memory()?;
    let vectors = VectorStore::in_memory(DIMENSION);
    let embedder = HashingEmbedder::new(DIMENSION)?;

    let animals = store.create_category("Animals")?;
    let history = store.create_category("History")?;
    let fox_keyword = store.create_keyword("fox")?;

    let fox = store.create_document(&NewDocument::new(
        "A Brown Fox",
        "Quick and clever",
        "https://example.org/fox",
        animals.id,
    ))?;
    let dynasty = store.create_document(
        &NewDocument::new(
            "Nguyen dynasty",
            "Last imperial dynasty",
            "https://example.org/nguyen",
            history.id,
        )
        .with_keywords(vec![fox_keyword.id]),
    )?;
    let unrelated = store.create_document(&NewDocument::new(
        "Tea ceremony",
        "Traditional ritual",
        "https://example.org/tea",
        history.id,
    ))?;

    for document in [&dynasty, &unrelated] {
        let embedded = embedder
            .embed_batch(vec![document.title.clone(), document.summary.clone()])
            .await?;
        vectors.upsert(document.id, embedded).await?;
    }

    let retrieval = HybridRetrieval::new(
        RetrievalConfig::default(),
        Arc::new(embedder),
        Arc::new(vectors),
        Arc::new(store),
    )?;

    Ok(Fixture {
        retrieval,
        fox: fox.id,
        dynasty: dynasty.id,
        unrelated: unrelated.id,
    })
}

#[tokio::test]
async fn test_textual_extends_semantic_results() -> anyhow::Result<()> {
    let fixture = fixture().await?;

    // "dynasty" is the nearest vector; "fox" and "brown" reach the fox
    // document textually and the dynasty document through its keyword.
    let results = fixture.retrieval.search("dynasty brown fox", 3).await?;
    let ids: Vec<DocumentId> = results.results.iter().map(|r| r.document.id).collect();

    assert_eq!(ids[0], fixture.dynasty);
    assert_eq!(results.results[0].source, SearchSource::Semantic);
    assert!(ids.contains(&fixture.fox));

    let fox = results
        .results
        .iter()
        .find(|r| r.document.id == fixture.fox)
        .map(|r| r.source);
    assert_eq!(fox, Some(SearchSource::Textual));

    let unique: std::collections::HashSet<DocumentId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    Ok(())
}

#[tokio::test]
async fn test_limit_one_keeps_best_semantic_hit() -> anyhow::Result<()> {
    let fixture = fixture().await?;

    let documents = fixture.retrieval.search_documents("tea ceremony", 1).await?;
    let ids: Vec<DocumentId> = documents.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![fixture.unrelated]);
    Ok(())
}

#[tokio::test]
async fn test_invalid_limit_is_rejected() -> anyhow::Result<()> {
    let fixture = fixture().await?;
    assert!(fixture.retrieval.search("fox", 0).await.is_err());
    assert!(fixture.retrieval.search("fox", 1_000).await.is_err());
    Ok(())
}
