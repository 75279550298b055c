//! HTTP surface of the catalog: category browsing, hybrid search and article
//! extraction. Every response uses the `{status, data}` envelope from
//! `catalog-protocol`.

mod article;
mod config;
mod error;
mod routes;

pub use article::ArticleError;
pub use article::ArticleFetcher;
pub use article::NO_CONTENT_HTML;
pub use article::extract_article;
pub use config::ServerConfig;
pub use routes::AppState;
pub use routes::build_router;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Bind `config.bind_addr` and serve until the process stops
pub async fn run_server(config: ServerConfig, state: AppState) -> Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;
    let app = build_router(state, &config)?;
    let listener = TcpListener::bind(config.bind_addr).await?;
    serve(listener, app).await
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("catalog server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
