use catalog_protocol::Document;
use serde::{Deserialize, Serialize};

/// Which matcher first contributed a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    /// From vector similarity search
    Semantic,
    /// From substring matching
    Textual,
}

/// A single search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The hydrated document
    pub document: Document,

    /// Source of this result
    pub source: SearchSource,

    /// Position in the merged list (0 = best)
    pub rank: usize,
}

/// Collection of search results with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Query that produced these results
    pub query: String,

    /// Search results, in merged order
    pub results: Vec<SearchResult>,

    /// Search statistics
    pub stats: SearchStats,
}

/// Search performance statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total search time in milliseconds
    pub total_time_ms: u64,

    /// Embedding plus vector search time in milliseconds
    pub semantic_time_ms: u64,

    /// Textual search time in milliseconds
    pub textual_time_ms: u64,

    /// Hydration time in milliseconds
    pub hydrate_time_ms: u64,

    /// Number of ids the semantic matcher returned, before merging
    pub semantic_count: usize,

    /// Number of ids the textual matcher returned, before merging
    pub textual_count: usize,

    /// Number of ids after merging
    pub merged_count: usize,
}

impl SearchResults {
    /// Create new search results
    pub fn new(query: String) -> Self {
        Self {
            query,
            results: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Add results
    pub fn with_results(mut self, results: Vec<SearchResult>) -> Self {
        self.results = results;
        self
    }

    /// Set stats
    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = stats;
        self
    }

    /// Get top N results
    pub fn top(&self, n: usize) -> &[SearchResult] {
        &self.results[..n.min(self.results.len())]
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Drop the metadata and keep the ordered documents
    pub fn into_documents(self) -> Vec<Document> {
        self.results.into_iter().map(|r| r.document).collect()
    }
}
