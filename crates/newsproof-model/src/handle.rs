//! Lazily loaded, process-wide model handle.

use std::{path::PathBuf, sync::Arc};

use newsproof_core::classify::{Classifier, Prediction};
use once_cell::sync::OnceCell;
use tracing::warn;

use crate::{Result, model::ReliabilityModel};

/// Loads the model from disk on first use and shares it afterwards.
///
/// A failed load is not cached; the next call tries again.
#[derive(Debug)]
pub struct ModelHandle {
  dir:  PathBuf,
  cell: OnceCell<Arc<ReliabilityModel>>,
}

impl ModelHandle {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into(), cell: OnceCell::new() }
  }

  pub fn is_loaded(&self) -> bool { self.cell.get().is_some() }

  pub fn get(&self) -> Result<Arc<ReliabilityModel>> {
    self
      .cell
      .get_or_try_init(|| ReliabilityModel::load(&self.dir).map(Arc::new))
      .map(Arc::clone)
  }

  /// Load the model now rather than on the first request.
  pub fn preload(&self) -> Result<()> { self.get().map(|_| ()) }
}

impl Classifier for ModelHandle {
  type Error = crate::Error;

  fn predict(&self, text: &str) -> Result<Prediction> {
    let model = self.get().inspect_err(|e| {
      warn!(dir = %self.dir.display(), error = %e, "model unavailable");
    })?;
    model.predict_proba(text)
  }
}
