use crate::article::ArticleError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use catalog_protocol::ApiResponse;
use catalog_protocol::ErrorKind;
use catalog_retrieval::RetrievalError;
use catalog_store::StoreError;
use tracing::warn;

/// Failure rendered through the same envelope as successes
#[derive(Debug)]
pub(crate) struct AppError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: ErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            kind: ErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub(crate) fn store(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: ErrorKind::StoreFailure,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::store(err)
    }
}

impl From<RetrievalError> for AppError {
    fn from(err: RetrievalError) -> Self {
        let status = match err {
            RetrievalError::InvalidLimit { .. } => StatusCode::BAD_REQUEST,
            RetrievalError::Embedding(_)
            | RetrievalError::Index(_)
            | RetrievalError::Store(_)
            | RetrievalError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<ArticleError> for AppError {
    fn from(err: ArticleError) -> Self {
        let (status, kind) = match err {
            ArticleError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, ErrorKind::InvalidRequest),
            ArticleError::Http(_) => (StatusCode::BAD_GATEWAY, ErrorKind::UpstreamFailure),
            ArticleError::Selector(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::UpstreamFailure)
            }
        };
        Self {
            status,
            kind,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, kind = ?self.kind, "request failed: {}", self.message);
        let body = ApiResponse::error(self.kind, self.message);
        (self.status, Json(body)).into_response()
    }
}
