//! API error type, the response envelope and the
//! [`axum::response::IntoResponse`] implementation.
//!
//! Every response body has the shape `{"data": ..., "error": ...}`; exactly
//! one of the two is non-null.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `{"message": <summary>, "error": <detail>}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub message: String,
  pub error:   String,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub data:  Option<T>,
  pub error: Option<ErrorBody>,
}

impl<T: Serialize> Envelope<T> {
  pub fn ok(data: T) -> Json<Self> { Json(Self { data: Some(data), error: None }) }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{message}: {detail}")]
  Unauthorized { message: &'static str, detail: String },

  #[error("invalid request: {0}")]
  Validation(String),

  #[error("article already analyzed: {0}")]
  Conflict(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("{message}: {source}")]
  Internal {
    message: &'static str,
    #[source]
    source:  BoxError,
  },
}

impl ApiError {
  pub fn missing_token() -> Self {
    Self::Unauthorized {
      message: "Authentication required",
      detail:  "missing bearer token".into(),
    }
  }

  pub fn invalid_token(detail: impl Into<String>) -> Self {
    Self::Unauthorized {
      message: "Invalid authentication token",
      detail:  detail.into(),
    }
  }

  /// Convert a pipeline error. Storage failures are reported under
  /// `storage_message`, which names the operation that failed.
  pub fn from_core(e: newsproof_core::Error, storage_message: &'static str) -> Self {
    use newsproof_core::Error as E;
    match e {
      E::InvalidUrl { url, reason } => Self::Validation(format!("invalid url {url:?}: {reason}")),
      E::AlreadyAnalyzed(url) => Self::Conflict(url),
      E::EntryNotFound(id) => Self::NotFound(format!("history entry {id}")),
      E::Fetch(source) => Self::Internal { message: "Failed to pull article", source },
      E::Inference(source) => Self::Internal { message: "Failed to analyze article", source },
      E::Store(source) => Self::Internal { message: storage_message, source },
    }
  }

  /// `map_err` adapter for [`Self::from_core`].
  pub fn core(storage_message: &'static str) -> impl FnOnce(newsproof_core::Error) -> Self {
    move |e| Self::from_core(e, storage_message)
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
      Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Conflict(_) => StatusCode::CONFLICT,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn body(self) -> ErrorBody {
    let (message, error) = match self {
      Self::Unauthorized { message, detail } => (message.to_owned(), detail),
      Self::Validation(detail) => ("Invalid request".to_owned(), detail),
      Self::Conflict(url) => ("Article already analyzed".to_owned(), url),
      Self::NotFound(detail) => ("Article not found".to_owned(), detail),
      Self::Internal { message, source } => (message.to_owned(), source.to_string()),
    };
    ErrorBody { message, error }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::Validation(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::Validation(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(error = %self, "request failed");
    } else {
      debug!(%status, error = %self, "request rejected");
    }

    let body = Envelope::<()> { data: None, error: Some(self.body()) };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn render(e: ApiError) -> (StatusCode, serde_json::Value) {
    let resp = e.into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn conflict_uses_envelope() {
    let (status, body) =
      render(ApiError::from_core(newsproof_core::Error::AlreadyAnalyzed("u".into()), "x")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["message"], "Article already analyzed");
    assert_eq!(body["error"]["error"], "u");
  }

  #[tokio::test]
  async fn storage_failures_name_the_operation() {
    let e = newsproof_core::Error::Store("disk full".into());
    let (status, body) = render(ApiError::from_core(e, "Failed to clear article history")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Failed to clear article history");
    assert_eq!(body["error"]["error"], "disk full");
  }

  #[tokio::test]
  async fn invalid_url_is_unprocessable() {
    let e = newsproof_core::Error::InvalidUrl { url: "".into(), reason: "URL is required".into() };
    let (status, body) = render(ApiError::from_core(e, "x")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["error"].as_str().unwrap().contains("URL is required"));
  }
}
