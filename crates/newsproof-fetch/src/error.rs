//! Error type for `newsproof-fetch`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Request {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{url} responded with HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("{url} is not an HTML page (content type {content_type:?})")]
  NotHtml { url: String, content_type: String },

  #[error("no article title or text found at {url}")]
  NoContent { url: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
