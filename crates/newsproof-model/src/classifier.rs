//! Binary logistic regression over TF-IDF features.

use newsproof_core::classify::Prediction;
use serde::Deserialize;

use crate::{Error, Result};

/// On-disk form of a fitted classifier (`model.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
  /// One weight per feature column.
  pub coef:       Vec<f64>,
  pub intercept:  f64,
  /// Class labels in model order; the decision function scores `classes[1]`.
  #[serde(default = "default_classes")]
  pub classes:    [i64; 2],
  /// Which class label means "fake". The training data labels fake as 1.
  #[serde(default = "default_fake_label")]
  pub fake_label: i64,
}

fn default_classes() -> [i64; 2] { [0, 1] }

fn default_fake_label() -> i64 { 1 }

#[derive(Debug, Clone)]
pub struct LogisticRegression {
  coef:            Vec<f64>,
  intercept:       f64,
  /// `true` when the decision function scores the fake class.
  positive_is_fake: bool,
}

impl LogisticRegression {
  pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
    if artifact.coef.is_empty() {
      return Err(Error::InvalidArtifact("classifier has no coefficients".into()));
    }
    if artifact.classes[0] == artifact.classes[1] {
      return Err(Error::InvalidArtifact("classifier classes must be distinct".into()));
    }
    if !artifact.classes.contains(&artifact.fake_label) {
      return Err(Error::InvalidArtifact(format!(
        "fake label {} is not one of the classes {:?}",
        artifact.fake_label, artifact.classes
      )));
    }
    if !artifact.intercept.is_finite() || artifact.coef.iter().any(|w| !w.is_finite()) {
      return Err(Error::InvalidArtifact("classifier has non-finite weights".into()));
    }

    Ok(Self {
      coef:             artifact.coef,
      intercept:        artifact.intercept,
      positive_is_fake: artifact.classes[1] == artifact.fake_label,
    })
  }

  /// Number of features the model expects.
  pub fn dim(&self) -> usize { self.coef.len() }

  /// `[P(real), P(fake)]` for one feature vector.
  pub fn predict_proba(&self, features: &[f64]) -> Result<Prediction> {
    if features.len() != self.dim() {
      return Err(Error::DimensionMismatch { expected: self.dim(), got: features.len() });
    }

    let z = self.intercept
      + self.coef.iter().zip(features).map(|(w, x)| w * x).sum::<f64>();
    if !z.is_finite() {
      return Err(Error::NonFiniteScore);
    }
    let positive = sigmoid(z);
    let p_fake = if self.positive_is_fake { positive } else { 1.0 - positive };

    Ok(Prediction { real: 1.0 - p_fake, fake: p_fake })
  }
}

fn sigmoid(z: f64) -> f64 {
  if z >= 0.0 {
    1.0 / (1.0 + (-z).exp())
  } else {
    let e = z.exp();
    e / (1.0 + e)
  }
}
