use crate::error::VectorStoreError;
use crate::index::VectorIndex;
use async_trait::async_trait;
use catalog_protocol::DocumentId;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration for the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// File the index is persisted to
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Dimension of the embeddings
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_path() -> PathBuf {
    PathBuf::from(".catalog").join("vectors.json")
}

fn default_dimension() -> usize {
    768
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            dimension: default_dimension(),
        }
    }
}

/// A scored hit from [`VectorStore::search`]
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: DocumentId,

    /// Best cosine similarity over the document's vectors (-1.0 to 1.0)
    pub score: f32,
}

/// Vectors of one document, one per embedded field (title, summary).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedDocument {
    id: DocumentId,
    vectors: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedIndex {
    dimension: usize,
    documents: Vec<IndexedDocument>,
}

/// In-process vector index over catalog documents, persisted as JSON.
#[derive(Clone)]
pub struct VectorStore {
    path: Option<PathBuf>,
    dimension: usize,
    documents: Arc<RwLock<BTreeMap<DocumentId, IndexedDocument>>>,
}

impl VectorStore {
    /// Open the store described by `config`, loading the persisted index if
    /// the file exists
    pub async fn open(config: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        if config.dimension == 0 {
            return Err(VectorStoreError::Initialization(
                "dimension must be > 0".to_string(),
            ));
        }

        info!("Opening vector store at {}", config.path.display());

        let documents = if config.path.exists() {
            Self::load_from_disk(&config.path, config.dimension).await?
        } else {
            BTreeMap::new()
        };

        info!("Vector store holds {} documents", documents.len());
        Ok(Self {
            path: Some(config.path.clone()),
            dimension: config.dimension,
            documents: Arc::new(RwLock::new(documents)),
        })
    }

    /// Create a store that is never written to disk
    pub fn in_memory(dimension: usize) -> Self {
        Self {
            path: None,
            dimension,
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    async fn load_from_disk(
        path: &Path,
        dimension: usize,
    ) -> Result<BTreeMap<DocumentId, IndexedDocument>, VectorStoreError> {
        let content = tokio::fs::read(path).await?;
        let persisted: PersistedIndex = serde_json::from_slice(&content)?;
        if persisted.dimension != dimension {
            return Err(VectorStoreError::Initialization(format!(
                "{} was built with dimension {}, configured dimension is {dimension}",
                path.display(),
                persisted.dimension
            )));
        }

        Ok(persisted
            .documents
            .into_iter()
            .map(|doc| (doc.id, doc))
            .collect())
    }

    /// Write the index to its file. No-op for in-memory stores.
    pub async fn persist(&self) -> Result<(), VectorStoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let documents = self.documents.read().await;
        let persisted = PersistedIndex {
            dimension: self.dimension,
            documents: documents.values().cloned().collect(),
        };
        let content = serde_json::to_vec(&persisted)?;
        drop(documents);

        tokio::fs::write(path, content).await?;
        debug!("Persisted vector store to {}", path.display());
        Ok(())
    }

    /// Insert or replace the vectors of a document
    pub async fn upsert(
        &self,
        id: DocumentId,
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), VectorStoreError> {
        if vectors.is_empty() {
            return Err(VectorStoreError::EmptyDocument(id));
        }
        for vector in &vectors {
            self.check_dimension(vector)?;
        }

        let mut documents = self.documents.write().await;
        documents.insert(id, IndexedDocument { id, vectors });
        Ok(())
    }

    /// Remove a document, returning whether it was present
    pub async fn remove(&self, id: DocumentId) -> bool {
        self.documents.write().await.remove(&id).is_some()
    }

    /// Drop every document
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Number of indexed documents
    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top `k` documents by descending similarity; equal scores are ordered
    /// by ascending identifier
    pub async fn search(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<VectorMatch>, VectorStoreError> {
        self.check_dimension(vector)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().await;
        let mut matches: Vec<VectorMatch> = documents
            .values()
            .map(|doc| VectorMatch {
                id: doc.id,
                score: doc
                    .vectors
                    .iter()
                    .map(|candidate| cosine_similarity(vector, candidate))
                    .fold(f32::NEG_INFINITY, f32::max),
            })
            .collect();

        matches.sort_by(|a, b| match b.score.total_cmp(&a.score) {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        });
        matches.truncate(k);

        debug!("Vector search matched {} documents (k = {k})", matches.len());
        Ok(matches)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), VectorStoreError> {
        if vector.len() != self.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for VectorStore {
    async fn similarity_search(
        &self,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<DocumentId>, VectorStoreError> {
        Ok(self
            .search(vector, k)
            .await?
            .into_iter()
            .map(|hit| hit.id)
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}
