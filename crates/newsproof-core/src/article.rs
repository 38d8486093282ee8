//! The structured form of a fetched news page.
//!
//! An article is immutable once fetched. Within a user's history it is
//! identified by its URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched and parsed news article.
///
/// Field names on the wire follow the history format consumed by the web
/// frontend (`collected_date`, `publish_date`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
  /// The submitted URL in normalised form; unique within a user's history.
  pub url:          String,
  pub title:        String,
  pub authors:      Vec<String>,
  /// Host the article was served from, e.g. `www.example.com`.
  pub source:       String,
  /// When this server fetched the page.
  #[serde(rename = "collected_date")]
  pub collected_at: DateTime<Utc>,
  /// Publication time advertised by the page, if any.
  #[serde(rename = "publish_date")]
  pub published_at: Option<DateTime<Utc>>,
  /// Body text, paragraphs separated by blank lines.
  pub text:         String,
}

impl Article {
  /// The text fed to the classifier: title and body joined by a space.
  pub fn classification_text(&self) -> String {
    let mut out = String::with_capacity(self.title.len() + self.text.len() + 1);
    out.push_str(&self.title);
    out.push(' ');
    out.push_str(&self.text);
    out
  }
}
