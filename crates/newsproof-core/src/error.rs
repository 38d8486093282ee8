//! Error types for `newsproof-core`.

use thiserror::Error;

use crate::history::EntryId;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid url {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("article already analyzed: {0}")]
  AlreadyAnalyzed(String),

  #[error("history entry not found: {0}")]
  EntryNotFound(EntryId),

  #[error("failed to fetch article: {0}")]
  Fetch(#[source] BoxError),

  #[error("failed to classify article: {0}")]
  Inference(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
