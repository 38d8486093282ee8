//! [`HttpFetcher`], the `reqwest`-backed [`ArticleFetcher`].

use std::time::Duration;

use chrono::Utc;
use newsproof_core::{article::Article, fetch::ArticleFetcher};
use reqwest::{Client, header::CONTENT_TYPE};
use scraper::Html;
use tracing::{debug, info, instrument};
use url::Url;

use crate::{Error, Result, extract::extract};

/// Host recorded for URLs that have none.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Connection settings for [`HttpFetcher`].
#[derive(Debug, Clone, Default)]
pub struct FetcherConfig {
  /// Whole-request timeout; `None` uses the client default (no timeout).
  pub timeout:    Option<Duration>,
  pub user_agent: Option<String>,
}

/// Fetches article pages over HTTP(S) and parses them with `scraper`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new(config: &FetcherConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    if let Some(agent) = &config.user_agent {
      builder = builder.user_agent(agent.clone());
    }
    let client = builder.build().map_err(Error::Client)?;
    Ok(Self { client })
  }

  async fn fetch_html(&self, url: &Url) -> Result<String> {
    let request_failed = |source| Error::Request { url: url.to_string(), source };

    let resp = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(request_failed)?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { url: url.to_string(), status: status.as_u16() });
    }

    if let Some(content_type) = resp.headers().get(CONTENT_TYPE) {
      let content_type = content_type.to_str().unwrap_or_default().to_ascii_lowercase();
      if !is_html(&content_type) {
        return Err(Error::NotHtml { url: url.to_string(), content_type });
      }
    }

    resp.text().await.map_err(request_failed)
  }
}

fn is_html(content_type: &str) -> bool {
  let mime = content_type.split(';').next().unwrap_or_default().trim();
  mime == "text/html" || mime == "application/xhtml+xml"
}

/// The article's publisher as recorded in history: the URL host, or
/// [`UNKNOWN_SOURCE`].
pub fn source_of(url: &Url) -> String {
  url.host_str().unwrap_or(UNKNOWN_SOURCE).to_owned()
}

impl ArticleFetcher for HttpFetcher {
  type Error = Error;

  #[instrument(level = "info", skip_all, fields(%url))]
  async fn fetch(&self, url: &Url) -> Result<Article> {
    let collected_at = Utc::now();
    let body = self.fetch_html(url).await?;
    debug!(bytes = body.len(), "downloaded page");

    let extracted = extract(&Html::parse_document(&body));
    if extracted.is_empty() {
      return Err(Error::NoContent { url: url.to_string() });
    }

    info!(
      title = %extracted.title,
      authors = extracted.authors.len(),
      chars = extracted.text.len(),
      "parsed article"
    );

    Ok(Article {
      url: url.to_string(),
      title: extracted.title,
      authors: extracted.authors,
      source: source_of(url),
      collected_at,
      published_at: extracted.published_at,
      text: extracted.text,
    })
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
  };

  use super::*;

  const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>Senate passes budget</title>
    <meta name="author" content="Jane Doe">
    <meta property="article:published_time" content="2025-10-15T08:00:00Z">
  </head>
  <body>
    <article>
      <p>The Senate passed the budget late on Tuesday night.</p>
      <p>Lawmakers debated the measure for several hours.</p>
    </article>
  </body>
</html>"#;

  fn fetcher() -> HttpFetcher { HttpFetcher::new(&FetcherConfig::default()).unwrap() }

  async fn serve(template: ResponseTemplate) -> (MockServer, Url) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/story"))
      .respond_with(template)
      .expect(1)
      .mount(&server)
      .await;
    let url = Url::parse(&format!("{}/story", server.uri())).unwrap();
    (server, url)
  }

  #[tokio::test]
  async fn fetches_and_parses_article() {
    let (_server, url) =
      serve(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8")).await;

    let article = fetcher().fetch(&url).await.unwrap();
    assert_eq!(article.url, url.as_str());
    assert_eq!(article.title, "Senate passes budget");
    assert_eq!(article.authors, vec!["Jane Doe"]);
    assert_eq!(article.source, "127.0.0.1");
    assert!(article.published_at.is_some());
    assert!(article.text.starts_with("The Senate passed"));
    assert!(article.text.contains("\n\nLawmakers"));
  }

  #[tokio::test]
  async fn sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(header("user-agent", "newsproof-test/1.0"))
      .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html"))
      .expect(1)
      .mount(&server)
      .await;

    let fetcher = HttpFetcher::new(&FetcherConfig {
      timeout:    Some(Duration::from_secs(5)),
      user_agent: Some("newsproof-test/1.0".into()),
    })
    .unwrap();
    let url = Url::parse(&format!("{}/anything", server.uri())).unwrap();
    fetcher.fetch(&url).await.unwrap();
  }

  #[tokio::test]
  async fn non_success_status_is_an_error() {
    let (_server, url) = serve(ResponseTemplate::new(404)).await;
    let err = fetcher().fetch(&url).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 404, .. }));
  }

  #[tokio::test]
  async fn non_html_content_is_rejected() {
    let (_server, url) =
      serve(ResponseTemplate::new(200).set_body_raw("%PDF-1.7", "application/pdf")).await;
    let err = fetcher().fetch(&url).await.unwrap_err();
    assert!(matches!(err, Error::NotHtml { .. }));
  }

  #[tokio::test]
  async fn page_without_content_is_rejected() {
    let (_server, url) = serve(
      ResponseTemplate::new(200).set_body_raw("<html><body><div></div></body></html>", "text/html"),
    )
    .await;
    let err = fetcher().fetch(&url).await.unwrap_err();
    assert!(matches!(err, Error::NoContent { .. }));
  }

  #[tokio::test]
  async fn unreachable_host_is_a_request_error() {
    let url = Url::parse("http://127.0.0.1:1/story").unwrap();
    let err = fetcher().fetch(&url).await.unwrap_err();
    assert!(matches!(err, Error::Request { .. }));
  }

  #[test]
  fn source_is_the_host() {
    let url = Url::parse("https://www.theonion.com/story").unwrap();
    assert_eq!(source_of(&url), "www.theonion.com");
  }

  #[test]
  fn html_content_types() {
    assert!(is_html("text/html; charset=utf-8"));
    assert!(is_html("application/xhtml+xml"));
    assert!(!is_html("application/json"));
  }
}
