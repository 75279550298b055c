//! Fetching an article page and pulling out the parts a frontend renders.

use catalog_protocol::ArticleContent;
use reqwest::Url;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use scraper::Html;
use scraper::Selector;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Returned as `html` when the page has no main content element.
pub const NO_CONTENT_HTML: &str = "<p>No content found</p>";

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("Invalid article URL: {0}")]
    InvalidUrl(String),

    #[error("Article fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),
}

/// HTTP client for article pages, sending browser-like headers
#[derive(Clone)]
pub struct ArticleFetcher {
    http: reqwest::Client,
}

impl ArticleFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ArticleError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { http })
    }

    pub async fn fetch(&self, url: &str) -> Result<ArticleContent, ArticleError> {
        let url = parse_url(url)?;
        debug!("fetching article {url}");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        extract_article(&body)
    }
}

fn parse_url(raw: &str) -> Result<Url, ArticleError> {
    let url = Url::parse(raw).map_err(|err| ArticleError::InvalidUrl(format!("{raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ArticleError::InvalidUrl(format!(
            "{raw}: unsupported scheme {scheme}"
        ))),
    }
}

fn selector(css: &str) -> Result<Selector, ArticleError> {
    Selector::parse(css).map_err(|err| ArticleError::Selector(format!("{css}: {err:?}")))
}

/// Outer HTML of `main#main-content`, every `<style>` body joined by
/// newlines, and the `href` of every stylesheet link.
pub fn extract_article(page: &str) -> Result<ArticleContent, ArticleError> {
    let document = Html::parse_document(page);
    let main_selector = selector("main#main-content")?;
    let style_selector = selector("style")?;
    let link_selector = selector(r#"link[rel~="stylesheet"]"#)?;

    let html = document
        .select(&main_selector)
        .next()
        .map_or_else(|| NO_CONTENT_HTML.to_string(), |main| main.html());

    let style = document
        .select(&style_selector)
        .map(|element| element.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    let links = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ArticleContent { html, style, links })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <style>body { margin: 0; }</style>
    <link rel="stylesheet" href="/static/site.css">
    <link rel="icon" href="/favicon.ico">
    <link rel="preload stylesheet" href="/static/print.css">
    <link rel="stylesheet">
  </head>
  <body>
    <nav>menu</nav>
    <main id="main-content"><h1>Rome</h1></main>
    <style>.hero { color: red; }</style>
  </body>
</html>"#;

    #[test]
    fn test_extracts_main_styles_and_links() {
        let article = extract_article(PAGE).unwrap();
        assert_eq!(article.html, r#"<main id="main-content"><h1>Rome</h1></main>"#);
        assert_eq!(article.style, "body { margin: 0; }\n.hero { color: red; }");
        assert_eq!(article.links, vec!["/static/site.css", "/static/print.css"]);
    }

    #[test]
    fn test_missing_main_content() {
        let article = extract_article("<html><body><main>other</main></body></html>").unwrap();
        assert_eq!(article.html, NO_CONTENT_HTML);
        assert_eq!(article.style, "");
        assert_eq!(article.links, Vec::<String>::new());
    }

    #[test]
    fn test_only_http_urls_accepted() {
        assert!(parse_url("https://example.org/a").is_ok());
        assert!(matches!(
            parse_url("file:///etc/passwd"),
            Err(ArticleError::InvalidUrl(_))
        ));
        assert!(matches!(parse_url("not a url"), Err(ArticleError::InvalidUrl(_))));
    }
}
