//! Relational catalog of categories, keywords and documents.
//!
//! Backed by SQLite through `rusqlite`. Every public operation runs inside a
//! scoped session (one transaction) that is released whether the operation
//! succeeds or fails.
//!
//! # Example
//!
//! ```no_run
//! use catalog_protocol::NewDocument;
//! use catalog_store::{CatalogStore, StoreConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = CatalogStore::open(&StoreConfig::default())?;
//! let history = store.create_category("History")?;
//! let doc = store.create_document(&NewDocument::new(
//!     "The Nguyen Dynasty",
//!     "Last imperial dynasty of Vietnam",
//!     "https://example.org/nguyen",
//!     history.id,
//! ))?;
//! let hits = store.search_documents_textual(&["nguyen".to_string()], 10)?;
//! assert_eq!(hits, vec![doc.id]);
//! # Ok(())
//! # }
//! ```

mod config;
mod document_store;
mod error;
mod schema;
mod store;
mod textual;

pub use config::StoreConfig;
pub use document_store::DocumentStore;
pub use error::{Result, StoreError};
pub use store::CatalogStore;
