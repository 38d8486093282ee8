//! Verdicts and the policy that derives them from a classifier prediction.
//!
//! The policy is a pure function of `P(real)` and the article's source host.
//! Known satire publishers are checked first: a satire source always gets the
//! satire verdict, whatever the model says. Everything else is split on
//! [`RELIABLE_THRESHOLD`].

use serde::{Deserialize, Serialize};

// ─── Labels ──────────────────────────────────────────────────────────────────

/// `P(real)` must be strictly greater than this for a "Reliable" label.
pub const RELIABLE_THRESHOLD: f64 = 0.60;

/// Publishers that only run satire.
pub const SATIRE_DOMAINS: &[&str] = &[
  "theonion.com",
  "babylonbee.com",
  "clickhole.com",
  "thebeaverton.com",
  "newsthump.com",
  "waterfordwhispersnews.com",
  "reductress.com",
  "thedailymash.co.uk",
  "thehardtimes.net",
  "duffelblog.com",
  "the-postillon.com",
  "hard-drive.net",
];

/// Broad category shown next to the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
  #[serde(rename = "Real News")]
  RealNews,
  #[serde(rename = "Fake News")]
  FakeNews,
  Satire,
}

/// User-facing reliability judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruthnessLabel {
  Reliable,
  Unreliable,
  Satire,
}

/// A related article suggestion. No lookup is implemented yet, so verdicts
/// always carry an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArticle {
  pub url:   String,
  pub title: String,
}

// ─── Verdict ─────────────────────────────────────────────────────────────────

/// The classifier-derived judgment attached to an article. Never mutated
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
  pub genre:            Genre,
  pub truthness_label:  TruthnessLabel,
  /// `P(real)` for ordinary sources, `0.0` for satire sources.
  pub truthness_score:  f64,
  pub related_articles: Vec<RelatedArticle>,
  #[serde(default)]
  pub is_satire:        bool,
}

impl Verdict {
  /// Apply the verdict policy to `p_real` for an article served from
  /// `source`.
  pub fn decide(p_real: f64, source: &str) -> Self {
    if is_satire_domain(source) {
      return Self {
        genre:            Genre::Satire,
        truthness_label:  TruthnessLabel::Satire,
        truthness_score:  0.0,
        related_articles: Vec::new(),
        is_satire:        true,
      };
    }

    let score = p_real.clamp(0.0, 1.0);
    let (genre, truthness_label) = if score > RELIABLE_THRESHOLD {
      (Genre::RealNews, TruthnessLabel::Reliable)
    } else {
      (Genre::FakeNews, TruthnessLabel::Unreliable)
    };

    Self {
      genre,
      truthness_label,
      truthness_score: score,
      related_articles: Vec::new(),
      is_satire: false,
    }
  }
}

/// Whether `source` is, or is a subdomain of, a known satire publisher.
///
/// Matching is case-insensitive and ignores any port and trailing dot.
pub fn is_satire_domain(source: &str) -> bool {
  let host = source.trim().to_ascii_lowercase();
  let host = host.split(':').next().unwrap_or_default().trim_end_matches('.');
  let host = host.strip_prefix("www.").unwrap_or(host);

  SATIRE_DOMAINS.iter().any(|domain| {
    host == *domain
      || host
        .strip_suffix(domain)
        .is_some_and(|prefix| prefix.ends_with('.'))
  })
}
