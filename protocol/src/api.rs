use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// Body of `POST /search`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Machine-readable failure category carried next to the human-readable
/// error message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EmbeddingFailure,
    IndexFailure,
    StoreFailure,
    InvalidLimit,
    InvalidRequest,
    NotFound,
    UpstreamFailure,
}

/// Envelope returned by every HTTP endpoint:
/// `{"status": "success", "data": ...}` or
/// `{"status": "error", "data": "<message>", "kind": "..."}`.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    pub data: T,
    pub kind: Option<ErrorKind>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            data,
            kind: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }
}

impl ApiResponse<String> {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            data: message.into(),
            kind: Some(kind),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub documents_indexed: usize,
}

/// Readable part of an article page, ready to be embedded by a frontend.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleContent {
    /// Outer HTML of the page's main content element.
    pub html: String,
    /// Concatenated text of every `<style>` element.
    pub style: String,
    /// `href` of every stylesheet link.
    pub links: Vec<String>,
}
