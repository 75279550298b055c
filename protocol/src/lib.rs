//! Types shared by every crate of the catalog search workspace: the catalog
//! records owned by the relational store and the JSON envelope spoken by the
//! HTTP server.

mod api;
mod catalog;

pub use api::ApiResponse;
pub use api::ApiStatus;
pub use api::ArticleContent;
pub use api::ErrorKind;
pub use api::HealthStatus;
pub use api::SearchRequest;
pub use catalog::Category;
pub use catalog::CategoryId;
pub use catalog::Document;
pub use catalog::DocumentId;
pub use catalog::Keyword;
pub use catalog::KeywordId;
pub use catalog::NewDocument;
