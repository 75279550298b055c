//! # Catalog Vector Store
//!
//! Vector storage and nearest-neighbour retrieval for semantic catalog search.
//! Each document is indexed with one vector per embedded field (title and
//! summary); a document's similarity to a query is its best field.
//!
//! ## Features
//!
//! - Cosine similarity search with deterministic tie-breaking
//! - Incremental upserts and removals
//! - JSON persistence
//! - A [`VectorIndex`] trait for injecting other backends
//!
//! ## Example
//!
//! ```no_run
//! use catalog_vector_store::{VectorIndex, VectorStore, VectorStoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = VectorStore::open(&VectorStoreConfig::default()).await?;
//!     let query = vec![0.0_f32; store.dimension()];
//!     let ids = store.similarity_search(&query, 5).await?;
//!     println!("Found {} similar documents", ids.len());
//!     Ok(())
//! }
//! ```

mod error;
mod index;
mod store;

pub use error::VectorStoreError;
pub use index::VectorIndex;
pub use store::{VectorMatch, VectorStore, VectorStoreConfig};
