use crate::config::RetrievalConfig;
use crate::error::{Result, RetrievalError};
use crate::hydrate::Hydrator;
use crate::merge::merge_ranked;
use crate::result::{SearchResult, SearchResults, SearchSource, SearchStats};
use crate::semantic::SemanticMatcher;
use crate::textual::TextualMatcher;
use catalog_embeddings::Embedder;
use catalog_protocol::{Document, DocumentId};
use catalog_store::DocumentStore;
use catalog_vector_store::VectorIndex;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Hybrid retrieval engine combining semantic and textual search
pub struct HybridRetrieval {
    config: RetrievalConfig,
    semantic: SemanticMatcher,
    textual: TextualMatcher,
    hydrator: Hydrator,
}

impl HybridRetrieval {
    /// Create new hybrid retrieval engine over the three collaborators
    pub fn new(
        config: RetrievalConfig,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self> {
        config.validate().map_err(RetrievalError::InvalidConfig)?;

        info!(
            "Initializing hybrid retrieval engine (max limit {})",
            config.max_limit
        );

        Ok(Self {
            config,
            semantic: SemanticMatcher::new(embedder, index),
            textual: TextualMatcher::new(Arc::clone(&store)),
            hydrator: Hydrator::new(store),
        })
    }

    /// Search for documents relevant to `query`.
    ///
    /// Semantic and textual search run concurrently; a failure in either
    /// fails the whole search.
    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResults> {
        let start = Instant::now();

        if !self.config.accepts_limit(limit) {
            return Err(RetrievalError::InvalidLimit {
                limit,
                max: self.config.max_limit,
            });
        }

        debug!("Hybrid search for: '{query}' (limit {limit})");

        let mut stats = SearchStats::default();

        // Stage 1: both matchers
        let semantic_search = async {
            let started = Instant::now();
            let ids = self.semantic.search(query, limit).await?;
            Ok::<_, RetrievalError>((ids, elapsed_ms(started)))
        };
        let textual_search = async {
            let started = Instant::now();
            let ids = self.textual.search(query, limit).await?;
            Ok::<_, RetrievalError>((ids, elapsed_ms(started)))
        };
        let ((semantic_ids, semantic_ms), (textual_ids, textual_ms)) =
            tokio::try_join!(semantic_search, textual_search)?;

        stats.semantic_time_ms = semantic_ms;
        stats.semantic_count = semantic_ids.len();
        stats.textual_time_ms = textual_ms;
        stats.textual_count = textual_ids.len();

        // Stage 2: merge
        let merged = merge_ranked(&semantic_ids, &textual_ids, limit);
        stats.merged_count = merged.len();

        // Stage 3: hydrate
        let hydrate_start = Instant::now();
        let ids: Vec<DocumentId> = merged.iter().map(|(id, _)| *id).collect();
        let documents = self.hydrator.hydrate(&ids).await?;
        stats.hydrate_time_ms = elapsed_ms(hydrate_start);

        let results = attach_sources(&merged, documents);
        stats.total_time_ms = elapsed_ms(start);

        info!(
            "Search completed in {}ms, returned {} results ({} semantic, {} textual)",
            stats.total_time_ms,
            results.len(),
            stats.semantic_count,
            stats.textual_count
        );

        Ok(SearchResults::new(query.to_string())
            .with_results(results)
            .with_stats(stats))
    }

    /// Same as [`HybridRetrieval::search`], keeping only the ordered documents
    pub async fn search_documents(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        Ok(self.search(query, limit).await?.into_documents())
    }

    /// Get configuration
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }
}

fn attach_sources(
    merged: &[(DocumentId, SearchSource)],
    documents: Vec<Document>,
) -> Vec<SearchResult> {
    let sources: HashMap<DocumentId, SearchSource> = merged.iter().copied().collect();
    documents
        .into_iter()
        .enumerate()
        .map(|(rank, document)| SearchResult {
            source: sources
                .get(&document.id)
                .copied()
                .unwrap_or(SearchSource::Semantic),
            document,
            rank,
        })
        .collect()
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_embeddings::EmbeddingError;
    use catalog_protocol::ErrorKind;
    use catalog_store::StoreError;
    use catalog_vector_store::VectorStoreError;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEmbedder {
        fail: bool,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            if self.fail {
                return Err(EmbeddingError::EmbeddingGeneration("model offline".to_string()));
            }
            Ok(vec![1.0, 0.0])
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct FixedIndex {
        ids: Vec<DocumentId>,
        fail: bool,
    }

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn similarity_search(
            &self,
            _vector: &[f32],
            k: usize,
        ) -> std::result::Result<Vec<DocumentId>, VectorStoreError> {
            if self.fail {
                return Err(VectorStoreError::InvalidQuery("index offline".to_string()));
            }
            Ok(self.ids.iter().copied().take(k).collect())
        }
    }

    /// Serves a fixed textual answer and every document id in `known`
    #[derive(Default)]
    struct FakeStore {
        textual: Vec<DocumentId>,
        known: Vec<DocumentId>,
        fail: bool,
        textual_calls: AtomicUsize,
        fetched: Mutex<Vec<Vec<DocumentId>>>,
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn search_textual(
            &self,
            _tokens: &[String],
            limit: usize,
        ) -> catalog_store::Result<Vec<DocumentId>> {
            self.textual_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Task("store offline".to_string()));
            }
            Ok(self.textual.iter().copied().take(limit).collect())
        }

        async fn fetch_by_ids(&self, ids: &[DocumentId]) -> catalog_store::Result<Vec<Document>> {
            self.fetched.lock().unwrap().push(ids.to_vec());
            // reversed, to prove the engine restores order itself
            Ok(ids
                .iter()
                .rev()
                .filter(|id| self.known.contains(id))
                .map(|id| doc(*id))
                .collect())
        }
    }

    fn doc(id: DocumentId) -> Document {
        Document {
            id,
            title: format!("Document {id}"),
            summary: String::new(),
            link: format!("https://example.org/{id}"),
            category_id: 1,
            keyword_ids: Vec::new(),
        }
    }

    fn engine(semantic: Vec<DocumentId>, store: Arc<FakeStore>) -> HybridRetrieval {
        HybridRetrieval::new(
            RetrievalConfig::default(),
            Arc::new(FixedEmbedder { fail: false }),
            Arc::new(FixedIndex {
                ids: semantic,
                fail: false,
            }),
            store,
        )
        .unwrap()
    }

    fn ids_of(results: &SearchResults) -> Vec<DocumentId> {
        results.results.iter().map(|r| r.document.id).collect()
    }

    #[tokio::test]
    async fn test_semantic_first_then_textual() {
        let store = Arc::new(FakeStore {
            textual: vec![9, 2, 7],
            known: vec![2, 5, 7, 9],
            ..Default::default()
        });
        let engine = engine(vec![5, 2], Arc::clone(&store));

        let results = engine.search("fox", 4).await.unwrap();
        assert_eq!(ids_of(&results), vec![5, 2, 9, 7]);

        let sources: Vec<SearchSource> = results.results.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                SearchSource::Semantic,
                SearchSource::Semantic,
                SearchSource::Textual,
                SearchSource::Textual,
            ]
        );
        assert_eq!(results.stats.semantic_count, 2);
        assert_eq!(results.stats.textual_count, 3);
        assert_eq!(results.stats.merged_count, 4);

        // one batch fetch with the merged order
        assert_eq!(*store.fetched.lock().unwrap(), vec![vec![5, 2, 9, 7]]);
    }

    #[tokio::test]
    async fn test_limit_truncates_merged_ids() {
        let store = Arc::new(FakeStore {
            textual: vec![9, 2, 7, 5],
            known: vec![2, 5, 7, 9],
            ..Default::default()
        });
        let engine = engine(vec![5, 2, 9], store);

        let results = engine.search("fox", 3).await.unwrap();
        assert_eq!(ids_of(&results), vec![5, 2, 9]);
        let ranks: Vec<usize> = results.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_missing_documents_are_skipped() {
        let store = Arc::new(FakeStore {
            textual: vec![3],
            known: vec![1, 3],
            ..Default::default()
        });
        let engine = engine(vec![1, 2], store);

        let documents = engine.search_documents("fox", 10).await.unwrap();
        let ids: Vec<DocumentId> = documents.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_blank_query_skips_textual_store() {
        let store = Arc::new(FakeStore {
            textual: vec![3],
            known: vec![1, 3],
            ..Default::default()
        });
        let engine = engine(vec![1], Arc::clone(&store));

        let results = engine.search("   ", 10).await.unwrap();
        assert_eq!(ids_of(&results), vec![1]);
        assert_eq!(store.textual_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_sources_give_empty_results() {
        let store = Arc::new(FakeStore::default());
        let engine = engine(Vec::new(), Arc::clone(&store));

        let results = engine.search("nothing", 10).await.unwrap();
        assert!(results.is_empty());
        assert!(store.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_limit_rejected() {
        let store = Arc::new(FakeStore::default());
        let engine = engine(vec![1], Arc::clone(&store));

        for limit in [0, 101] {
            let err = engine.search("fox", limit).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidLimit);
        }
        assert_eq!(store.textual_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_fail_the_whole_query() {
        let known = vec![1, 2, 3];

        let engine = HybridRetrieval::new(
            RetrievalConfig::default(),
            Arc::new(FixedEmbedder { fail: true }),
            Arc::new(FixedIndex {
                ids: vec![1],
                fail: false,
            }),
            Arc::new(FakeStore {
                textual: vec![2],
                known: known.clone(),
                ..Default::default()
            }),
        )
        .unwrap();
        let err = engine.search("fox", 5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmbeddingFailure);

        let engine = HybridRetrieval::new(
            RetrievalConfig::default(),
            Arc::new(FixedEmbedder { fail: false }),
            Arc::new(FixedIndex {
                ids: vec![1],
                fail: true,
            }),
            Arc::new(FakeStore {
                textual: vec![2],
                known: known.clone(),
                ..Default::default()
            }),
        )
        .unwrap();
        let err = engine.search("fox", 5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexFailure);

        let engine = engine_with_failing_store(known);
        let err = engine.search("fox", 5).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreFailure);
    }

    fn engine_with_failing_store(known: Vec<DocumentId>) -> HybridRetrieval {
        let store = Arc::new(FakeStore {
            textual: vec![2],
            known,
            fail: true,
            ..Default::default()
        });
        engine(vec![1], store)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = HybridRetrieval::new(
            RetrievalConfig {
                max_limit: 0,
                default_limit: 0,
            },
            Arc::new(FixedEmbedder { fail: false }),
            Arc::new(FixedIndex {
                ids: Vec::new(),
                fail: false,
            }),
            Arc::new(FakeStore::default()),
        );
        assert!(matches!(result, Err(RetrievalError::InvalidConfig(_))));
    }
}
