use crate::article::ArticleFetcher;
use crate::config::ServerConfig;
use crate::error::AppError;
use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::header;
use axum::routing::get;
use axum::routing::post;
use catalog_protocol::ApiResponse;
use catalog_protocol::ArticleContent;
use catalog_protocol::Category;
use catalog_protocol::CategoryId;
use catalog_protocol::Document;
use catalog_protocol::HealthStatus;
use catalog_protocol::SearchRequest;
use catalog_retrieval::HybridRetrieval;
use catalog_store::CatalogStore;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;

/// Shared handles behind every request
#[derive(Clone)]
pub struct AppState {
    retrieval: Arc<HybridRetrieval>,
    store: CatalogStore,
    articles: ArticleFetcher,
}

impl AppState {
    pub fn new(
        retrieval: Arc<HybridRetrieval>,
        store: CatalogStore,
        config: &ServerConfig,
    ) -> Result<Self> {
        Ok(Self {
            retrieval,
            store,
            articles: ArticleFetcher::new(config.article_timeout())?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ArticleQuery {
    url: String,
}

/// All routes, with CORS restricted to `config.cors_origins`
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(Router::new()
        .route("/health", get(health_handler))
        .route("/categories", get(categories_handler))
        .route(
            "/categories/{category_id}/documents",
            get(category_documents_handler),
        )
        .route("/search", post(search_handler))
        .route("/article_content", get(article_handler))
        .with_state(state)
        .layer(cors))
}

async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthStatus>>, AppError> {
    let store = state.store.clone();
    let documents_indexed = run_store(move || store.count_documents()).await?;
    Ok(Json(ApiResponse::success(HealthStatus { documents_indexed })))
}

async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let store = state.store.clone();
    let categories = run_store(move || store.get_categories()).await?;
    Ok(Json(ApiResponse::success(categories)))
}

async fn category_documents_handler(
    State(state): State<AppState>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let Path(category_id) = path.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let store = state.store.clone();
    let documents = run_store(move || {
        if store.get_category_by_id(category_id)?.is_none() {
            return Ok(None);
        }
        store.get_documents_by_category(category_id).map(Some)
    })
    .await?
    .ok_or_else(|| AppError::not_found(format!("Category {category_id} not found")))?;
    Ok(Json(ApiResponse::success(documents)))
}

async fn search_handler(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let Json(request) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let documents = state
        .retrieval
        .search_documents(&request.query, request.limit)
        .await?;
    Ok(Json(ApiResponse::success(documents)))
}

async fn article_handler(
    State(state): State<AppState>,
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ArticleContent>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let article = state.articles.fetch(&query.url).await?;
    Ok(Json(ApiResponse::success(article)))
}

/// Run a blocking store operation off the async workers
async fn run_store<T, F>(f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> catalog_store::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(AppError::store)?;
    Ok(result?)
}
