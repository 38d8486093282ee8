//! The complete reliability model: vectorizer plus classifier, loaded from a
//! directory of JSON artifacts.

use std::{
  fs,
  path::{Path, PathBuf},
};

use newsproof_core::classify::{Classifier, Prediction};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
  Error, Result,
  classifier::{ClassifierArtifact, LogisticRegression},
  vectorizer::{TfidfVectorizer, VectorizerArtifact},
};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "model.json";

#[derive(Debug, Clone)]
pub struct ReliabilityModel {
  vectorizer: TfidfVectorizer,
  classifier: LogisticRegression,
}

impl ReliabilityModel {
  pub fn new(vectorizer: TfidfVectorizer, classifier: LogisticRegression) -> Result<Self> {
    if vectorizer.dim() != classifier.dim() {
      return Err(Error::DimensionMismatch {
        expected: classifier.dim(),
        got:      vectorizer.dim(),
      });
    }
    Ok(Self { vectorizer, classifier })
  }

  /// Load `vectorizer.json` and `model.json` from `dir`.
  pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
    let dir = dir.as_ref();
    let vectorizer: VectorizerArtifact = read_json(dir.join(VECTORIZER_FILE))?;
    let classifier: ClassifierArtifact = read_json(dir.join(CLASSIFIER_FILE))?;

    let model = Self::new(
      TfidfVectorizer::from_artifact(vectorizer)?,
      LogisticRegression::from_artifact(classifier)?,
    )?;

    info!(dir = %dir.display(), features = model.dim(), "loaded reliability model");
    Ok(model)
  }

  pub fn dim(&self) -> usize { self.vectorizer.dim() }

  pub fn predict_proba(&self, text: &str) -> Result<Prediction> {
    let features = self.vectorizer.transform(text);
    self.classifier.predict_proba(&features)
  }
}

impl Classifier for ReliabilityModel {
  type Error = Error;

  fn predict(&self, text: &str) -> Result<Prediction> { self.predict_proba(text) }
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T> {
  let raw = match fs::read(&path) {
    Ok(raw) => raw,
    Err(source) => return Err(Error::Io { path, source }),
  };
  serde_json::from_slice(&raw).map_err(|source| Error::Json { path, source })
}

#[cfg(test)]
pub(crate) mod tests {
  use std::path::Path;

  use super::*;

  /// Writes a tiny model where "hoax" pushes towards fake and "senate"
  /// towards real.
  pub(crate) fn write_artifacts(dir: &Path) {
    fs::write(
      dir.join(VECTORIZER_FILE),
      r#"{
        "vocabulary": {"senate": 0, "hoax": 1},
        "idf": [1.0, 1.0],
        "norm": "l2"
      }"#,
    )
    .unwrap();
    fs::write(
      dir.join(CLASSIFIER_FILE),
      r#"{"coef": [-3.0, 3.0], "intercept": 0.0, "classes": [0, 1]}"#,
    )
    .unwrap();
  }

  #[test]
  fn loads_and_predicts() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());

    let model = ReliabilityModel::load(dir.path()).unwrap();
    assert_eq!(model.dim(), 2);

    let real = model.predict("Senate passes budget").unwrap();
    assert!(real.real > 0.9);

    let fake = model.predict("Moon landing hoax").unwrap();
    assert!(fake.fake > 0.9);

    let neutral = model.predict("nothing in the vocabulary").unwrap();
    assert_eq!(neutral.real, 0.5);
  }

  #[test]
  fn loads_fully_specified_export() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join(VECTORIZER_FILE),
      r#"{
        "vocabulary": {"senate": 0, "hoax": 1},
        "idf": [1.5, 2.0],
        "lowercase": true,
        "sublinear_tf": true,
        "norm": "l2",
        "stop_words": ["the"]
      }"#,
    )
    .unwrap();
    fs::write(
      dir.path().join(CLASSIFIER_FILE),
      r#"{"coef": [-1.0, 2.0], "intercept": 0.5, "classes": [0, 1], "fake_label": 1}"#,
    )
    .unwrap();

    let model = ReliabilityModel::load(dir.path()).unwrap();
    let p = model.predict("The HOAX").unwrap();
    let expected_fake = 1.0 / (1.0 + (-2.5f64).exp());
    assert!((p.fake - expected_fake).abs() < 1e-12);
    assert!((p.real - (1.0 - expected_fake)).abs() < 1e-12);
  }

  #[test]
  fn missing_artifact_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReliabilityModel::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }

  #[test]
  fn malformed_artifact_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    fs::write(dir.path().join(CLASSIFIER_FILE), "{not json").unwrap();
    let err = ReliabilityModel::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
  }

  #[test]
  fn mismatched_dimensions_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    fs::write(dir.path().join(CLASSIFIER_FILE), r#"{"coef": [1.0], "intercept": 0.0}"#)
      .unwrap();
    let err = ReliabilityModel::load(dir.path()).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 1, got: 2 }));
  }
}
