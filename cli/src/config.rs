use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use catalog_embeddings::EmbeddingConfig;
use catalog_retrieval::RetrievalConfig;
use catalog_server::ServerConfig;
use catalog_store::StoreConfig;
use catalog_vector_store::VectorStoreConfig;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Which [`catalog_embeddings::Embedder`] backs ingestion and search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedderBackend {
    /// Local ONNX model through fastembed
    #[default]
    Fastembed,
    /// Model-free token hashing, for offline use
    Hashing,
}

/// Every section of the `catalog` TOML file. Each one is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub embedder: EmbedderBackend,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl CatalogConfig {
    /// Read `path`, or fall back to defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate every section and their agreement on the vector dimension
    pub fn validate(&self) -> Result<()> {
        if self.embedder == EmbedderBackend::Fastembed {
            self.embedding.validate().map_err(anyhow::Error::msg)?;
        } else if self.embedding.dimension == 0 {
            bail!("embedding.dimension must be > 0");
        }
        self.retrieval.validate().map_err(anyhow::Error::msg)?;
        self.server.validate().map_err(anyhow::Error::msg)?;

        if self.vector_store.dimension != self.embedding.dimension {
            bail!(
                "vector_store.dimension ({}) must match embedding.dimension ({})",
                self.vector_store.dimension,
                self.embedding.dimension
            );
        }
        Ok(())
    }
}
