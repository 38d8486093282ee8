//! The `Classifier` trait and its output type.

use serde::{Deserialize, Serialize};

/// A two-class probability distribution over {real, fake}.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  pub real: f64,
  pub fake: f64,
}

impl Prediction {
  /// Build a prediction from `P(real)`; `P(fake)` is its complement.
  pub fn from_real(real: f64) -> Self { Self { real, fake: 1.0 - real } }
}

/// A pre-trained binary text classifier.
///
/// Classification is synchronous and deterministic for a given set of model
/// artifacts and input text.
pub trait Classifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn predict(&self, text: &str) -> Result<Prediction, Self::Error>;
}
