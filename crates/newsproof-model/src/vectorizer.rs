//! TF-IDF feature extraction with a vocabulary fixed at training time.
//!
//! Tokenisation matches the training pipeline: the whole document is
//! lowercased (when enabled), then every run of two or more word characters
//! is a token. Out-of-vocabulary tokens are ignored.
//!
//! `\w` here is the `regex` crate's Unicode class, which also covers
//! combining marks (`\p{M}`). Python's `re` does not count marks as word
//! characters, so text with decomposed accents or Indic/Thai vowel signs can
//! split into different tokens than it did at training time. Latin, Cyrillic,
//! Greek and CJK text in NFC form tokenizes the same way.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::{Error, Result};

static TOKEN_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

// ─── Artifact ────────────────────────────────────────────────────────────────

/// Row normalisation applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
  #[default]
  L2,
  None,
}

/// On-disk form of a fitted vectorizer (`vectorizer.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
  /// Term → column index.
  pub vocabulary:   HashMap<String, usize>,
  /// Inverse document frequency, one per column.
  pub idf:          Vec<f64>,
  #[serde(default = "default_true")]
  pub lowercase:    bool,
  /// Use `1 + ln(tf)` instead of the raw term count.
  #[serde(default)]
  pub sublinear_tf: bool,
  #[serde(default)]
  pub norm:         Norm,
  #[serde(default)]
  pub stop_words:   Vec<String>,
}

fn default_true() -> bool { true }

// ─── Vectorizer ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
  vocabulary:   HashMap<String, usize>,
  idf:          Vec<f64>,
  lowercase:    bool,
  sublinear_tf: bool,
  norm:         Norm,
  stop_words:   HashSet<String>,
}

impl TfidfVectorizer {
  /// Validate an artifact and build a vectorizer from it.
  ///
  /// Every vocabulary index must be in range and used exactly once, and the
  /// IDF vector must have one entry per column.
  pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
    let dim = artifact.idf.len();
    if dim == 0 {
      return Err(Error::InvalidArtifact("vectorizer has an empty idf vector".into()));
    }
    if artifact.vocabulary.len() != dim {
      return Err(Error::InvalidArtifact(format!(
        "vocabulary has {} terms but idf has {dim} entries",
        artifact.vocabulary.len()
      )));
    }

    let mut seen = vec![false; dim];
    for (term, &index) in &artifact.vocabulary {
      let slot = seen.get_mut(index).ok_or_else(|| {
        Error::InvalidArtifact(format!("term {term:?} has out-of-range index {index}"))
      })?;
      if *slot {
        return Err(Error::InvalidArtifact(format!("index {index} is assigned twice")));
      }
      *slot = true;
    }
    if let Some(bad) = artifact.idf.iter().find(|w| !w.is_finite()) {
      return Err(Error::InvalidArtifact(format!("non-finite idf weight {bad}")));
    }

    let lowercase = artifact.lowercase;
    let stop_words = artifact
      .stop_words
      .into_iter()
      .map(|w| if lowercase { w.to_lowercase() } else { w })
      .collect();

    Ok(Self {
      vocabulary: artifact.vocabulary,
      idf: artifact.idf,
      lowercase,
      sublinear_tf: artifact.sublinear_tf,
      norm: artifact.norm,
      stop_words,
    })
  }

  /// Number of features produced by [`Self::transform`].
  pub fn dim(&self) -> usize { self.idf.len() }

  /// Split `text` into the tokens the vocabulary was fitted on.
  pub fn tokenize(&self, text: &str) -> Vec<String> {
    let lowered;
    let text = if self.lowercase {
      lowered = text.to_lowercase();
      lowered.as_str()
    } else {
      text
    };

    TOKEN_PATTERN
      .find_iter(text)
      .map(|m| m.as_str())
      .filter(|t| !self.stop_words.contains(*t))
      .map(str::to_owned)
      .collect()
  }

  /// Map `text` to a dense TF-IDF vector of length [`Self::dim`].
  pub fn transform(&self, text: &str) -> Vec<f64> {
    let mut counts = vec![0.0f64; self.dim()];
    for token in self.tokenize(text) {
      if let Some(&index) = self.vocabulary.get(token.as_str()) {
        counts[index] += 1.0;
      }
    }

    for (value, idf) in counts.iter_mut().zip(&self.idf) {
      if *value == 0.0 {
        continue;
      }
      let tf = if self.sublinear_tf { 1.0 + value.ln() } else { *value };
      *value = tf * idf;
    }

    if self.norm == Norm::L2 {
      let norm = counts.iter().map(|v| v * v).sum::<f64>().sqrt();
      if norm > 0.0 {
        for value in &mut counts {
          *value /= norm;
        }
      }
    }

    counts
  }
}
