//! # Catalog Embeddings
//!
//! Text embedding for semantic catalog search. Queries and document fields
//! (title, summary) are embedded with a local ONNX model via fastembed-rs.
//!
//! ## Features
//!
//! - Fast, local embedding generation using ONNX Runtime
//! - Batch processing support
//! - Configurable embedding dimensions (Matryoshka embeddings)
//! - An [`Embedder`] trait so callers can inject any implementation
//!
//! ## Example
//!
//! ```no_run
//! use catalog_embeddings::{Embedder, EmbeddingService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = EmbeddingService::new().await?;
//!     let vector = Embedder::embed(&service, "history of the roman empire").await?;
//!     println!("Embedding has {} dimensions", vector.len());
//!     Ok(())
//! }
//! ```

mod embedder;
mod error;
mod service;

pub use embedder::Embedder;
pub use embedder::HashingEmbedder;
pub use error::EmbeddingError;
pub use service::EmbeddingConfig;
pub use service::EmbeddingModelType;
pub use service::EmbeddingService;

/// Default embedding dimension for Nomic-embed-text-v1.5
pub const DEFAULT_EMBEDDING_DIM: usize = 768;
