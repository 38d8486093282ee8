//! Error type for `newsproof-store-sqlite`.

use newsproof_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("verdict score {0} is not a finite number")]
  NonFiniteScore(f64),

  /// The user already has an entry for this URL.
  #[error("history already contains {url}")]
  Duplicate { url: String },
}

impl StoreError for Error {
  fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
