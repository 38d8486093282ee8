//! Error types for model artifact loading and inference.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read model artifact {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse model artifact {path:?}: {source}")]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid model artifact: {0}")]
  InvalidArtifact(String),

  #[error("feature dimension mismatch: expected {expected}, got {got}")]
  DimensionMismatch { expected: usize, got: usize },

  #[error("classifier produced a non-finite score")]
  NonFiniteScore,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
