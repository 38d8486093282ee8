//! The article classification pipeline.
//!
//! `analyze` runs: dedup check against the user's history → fetch → classify
//! → verdict policy → insert. The dedup check and the insert are separate
//! store calls; backends are expected to reject a duplicate insert on their
//! own (see [`StoreError::is_duplicate`]).

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::{
  Error, Result,
  classify::Classifier,
  fetch::ArticleFetcher,
  history::{EntryId, HistoryEntry, NewHistoryEntry},
  store::{HistoryStore, StoreError},
  verdict::Verdict,
};

/// Parse and validate a user-submitted article URL.
///
/// Only absolute `http`/`https` URLs are accepted. The returned URL is in its
/// normalised form, which is also the form stored in history and used for
/// duplicate detection.
pub fn parse_article_url(raw: &str) -> Result<Url> {
  let trimmed = raw.trim();
  let invalid = |reason: String| Error::InvalidUrl { url: trimmed.to_owned(), reason };

  if trimmed.is_empty() {
    return Err(invalid("URL is required".into()));
  }
  let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
  match url.scheme() {
    "http" | "https" => Ok(url),
    other => Err(invalid(format!("unsupported scheme {other:?}"))),
  }
}

/// Orchestrates fetching, classification and persistence for one user at a
/// time. Cloning is cheap; every collaborator is reference-counted.
pub struct Pipeline<S, F, C> {
  store:      Arc<S>,
  fetcher:    Arc<F>,
  classifier: Arc<C>,
}

impl<S, F, C> Clone for Pipeline<S, F, C> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      fetcher:    Arc::clone(&self.fetcher),
      classifier: Arc::clone(&self.classifier),
    }
  }
}

impl<S, F, C> Pipeline<S, F, C>
where
  S: HistoryStore,
  F: ArticleFetcher,
  C: Classifier,
{
  pub fn new(store: Arc<S>, fetcher: Arc<F>, classifier: Arc<C>) -> Self {
    Self { store, fetcher, classifier }
  }

  /// Analyse `raw_url` on behalf of `user_id` and record the result.
  ///
  /// Returns [`Error::AlreadyAnalyzed`] without fetching anything if the URL
  /// is already in the user's history.
  pub async fn analyze(&self, user_id: &str, raw_url: &str) -> Result<HistoryEntry> {
    let url = parse_article_url(raw_url)?;

    let existing = self.store.list(user_id).await.map_err(store_error)?;
    if existing.iter().any(|e| e.article.url == url.as_str()) {
      debug!(user_id, %url, "rejecting duplicate submission");
      return Err(Error::AlreadyAnalyzed(url.into()));
    }

    let mut article = self
      .fetcher
      .fetch(&url)
      .await
      .map_err(|e| Error::Fetch(Box::new(e)))?;
    article.url = url.to_string();

    let prediction = self
      .classifier
      .predict(&article.classification_text())
      .map_err(|e| Error::Inference(Box::new(e)))?;
    if !(0.0..=1.0).contains(&prediction.real) {
      return Err(Error::Inference(
        format!("probability {} is outside [0, 1]", prediction.real).into(),
      ));
    }
    let verdict = Verdict::decide(prediction.real, &article.source);

    debug!(
      %url,
      p_real = prediction.real,
      label = ?verdict.truthness_label,
      "classified article"
    );

    let entry = self
      .store
      .insert(NewHistoryEntry { user_id: user_id.to_owned(), article, verdict })
      .await
      .map_err(|e| {
        if e.is_duplicate() {
          Error::AlreadyAnalyzed(url.to_string())
        } else {
          store_error(e)
        }
      })?;

    info!(
      user_id,
      entry_id = entry.id,
      history_index = entry.history_index,
      label = ?entry.ai_result.truthness_label,
      "recorded analysis"
    );
    Ok(entry)
  }

  /// The user's history, newest first.
  pub async fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
    self.store.list(user_id).await.map_err(store_error)
  }

  /// One of the user's entries; [`Error::EntryNotFound`] if it does not exist
  /// or belongs to someone else.
  pub async fn entry(&self, id: EntryId, user_id: &str) -> Result<HistoryEntry> {
    self
      .store
      .get(id, user_id)
      .await
      .map_err(store_error)?
      .ok_or(Error::EntryNotFound(id))
  }

  /// Delete the user's whole history, returning how many entries were
  /// removed.
  pub async fn clear(&self, user_id: &str) -> Result<u64> {
    let removed = self.store.delete_all(user_id).await.map_err(store_error)?;
    info!(user_id, removed, "cleared history");
    Ok(removed)
  }
}

fn store_error<E: StoreError>(e: E) -> Error { Error::Store(Box::new(e)) }

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  };

  use chrono::Utc;

  use super::*;
  use crate::{
    article::Article,
    classify::Prediction,
    verdict::{Genre, TruthnessLabel},
  };

  // ── Test doubles ──────────────────────────────────────────────────────────

  #[derive(Debug, thiserror::Error)]
  enum FakeStoreError {
    #[error("duplicate")]
    Duplicate,
    #[error("offline")]
    Offline,
  }

  impl StoreError for FakeStoreError {
    fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate) }
  }

  #[derive(Default)]
  struct MemoryStore {
    entries:    Mutex<Vec<HistoryEntry>>,
    offline:    bool,
    stale_list: bool,
  }

  impl HistoryStore for MemoryStore {
    type Error = FakeStoreError;

    async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>, Self::Error> {
      if self.offline {
        return Err(FakeStoreError::Offline);
      }
      if self.stale_list {
        return Ok(Vec::new());
      }
      let mut out: Vec<_> = self
        .entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.input_by_user == user_id)
        .cloned()
        .collect();
      out.sort_by(|a, b| b.history_index.cmp(&a.history_index));
      Ok(out)
    }

    async fn get(&self, id: EntryId, user_id: &str) -> Result<Option<HistoryEntry>, Self::Error> {
      Ok(
        self
          .entries
          .lock()
          .unwrap()
          .iter()
          .find(|e| e.id == id && e.input_by_user == user_id)
          .cloned(),
      )
    }

    async fn insert(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, Self::Error> {
      let mut entries = self.entries.lock().unwrap();
      let mine = entries.iter().filter(|e| e.input_by_user == entry.user_id);
      if mine.clone().any(|e| e.article.url == entry.article.url) {
        return Err(FakeStoreError::Duplicate);
      }
      let history_index = mine.map(|e| e.history_index).max().unwrap_or(0) + 1;
      let stored = HistoryEntry {
        id: entries.len() as EntryId + 1,
        input_by_user: entry.user_id,
        created_at: Utc::now(),
        history_index,
        article: entry.article,
        ai_result: entry.verdict,
      };
      entries.push(stored.clone());
      Ok(stored)
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, Self::Error> {
      let mut entries = self.entries.lock().unwrap();
      let before = entries.len();
      entries.retain(|e| e.input_by_user != user_id);
      Ok((before - entries.len()) as u64)
    }
  }

  #[derive(Debug, thiserror::Error)]
  #[error("connection refused")]
  struct FetchFailed;

  #[derive(Default)]
  struct StubFetcher {
    calls: AtomicUsize,
    fail:  bool,
  }

  impl ArticleFetcher for StubFetcher {
    type Error = FetchFailed;

    async fn fetch(&self, url: &Url) -> Result<Article, Self::Error> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if self.fail {
        return Err(FetchFailed);
      }
      Ok(Article {
        url:          url.to_string(),
        title:        "Title".into(),
        authors:      vec![],
        source:       url.host_str().unwrap_or_default().to_owned(),
        collected_at: Utc::now(),
        published_at: None,
        text:         "Body".into(),
      })
    }
  }

  struct FixedClassifier(f64);

  impl Classifier for FixedClassifier {
    type Error = std::convert::Infallible;

    fn predict(&self, _text: &str) -> Result<Prediction, Self::Error> {
      Ok(Prediction::from_real(self.0))
    }
  }

  type TestPipeline = Pipeline<MemoryStore, StubFetcher, FixedClassifier>;

  fn pipeline(p_real: f64) -> TestPipeline {
    Pipeline::new(
      Arc::new(MemoryStore::default()),
      Arc::new(StubFetcher::default()),
      Arc::new(FixedClassifier(p_real)),
    )
  }

  // ── URL validation ────────────────────────────────────────────────────────

  #[test]
  fn rejects_malformed_urls() {
    for raw in ["", "   ", "not a url", "ftp://example.com/x", "example.com/x"] {
      assert!(
        matches!(parse_article_url(raw), Err(Error::InvalidUrl { .. })),
        "{raw:?} should be rejected"
      );
    }
  }

  #[test]
  fn normalises_accepted_urls() {
    let url = parse_article_url("  https://Example.com  ").unwrap();
    assert_eq!(url.as_str(), "https://example.com/");
  }

  // ── analyze ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn analyze_scores_with_p_real() {
    let p = pipeline(0.75);
    let entry = p.analyze("alice", "https://example.com/a").await.unwrap();
    assert_eq!(entry.input_by_user, "alice");
    assert_eq!(entry.history_index, 1);
    assert_eq!(entry.ai_result.truthness_score, 0.75);
    assert_eq!(entry.ai_result.truthness_label, TruthnessLabel::Reliable);
    assert_eq!(entry.article.url, "https://example.com/a");
  }

  #[tokio::test]
  async fn analyze_satire_source_ignores_model() {
    let p = pipeline(0.95);
    let entry = p.analyze("alice", "https://www.theonion.com/story").await.unwrap();
    assert_eq!(entry.ai_result.genre, Genre::Satire);
    assert!(entry.ai_result.is_satire);
  }

  #[tokio::test]
  async fn duplicate_url_is_rejected_without_fetching() {
    let p = pipeline(0.4);
    p.analyze("alice", "https://example.com/a").await.unwrap();

    let err = p.analyze("alice", "https://example.com/a").await.unwrap_err();
    assert!(matches!(err, Error::AlreadyAnalyzed(_)));
    assert_eq!(p.fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(p.history("alice").await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn same_url_for_different_users_is_allowed() {
    let p = pipeline(0.4);
    p.analyze("alice", "https://example.com/a").await.unwrap();
    let bob = p.analyze("bob", "https://example.com/a").await.unwrap();
    assert_eq!(bob.history_index, 1);
  }

  #[tokio::test]
  async fn duplicate_reported_by_store_maps_to_already_analyzed() {
    // A stale listing lets the second submission past the pre-check.
    let p = Pipeline::new(
      Arc::new(MemoryStore { stale_list: true, ..Default::default() }),
      Arc::new(StubFetcher::default()),
      Arc::new(FixedClassifier(0.4)),
    );
    p.analyze("alice", "https://example.com/a").await.unwrap();

    let err = p.analyze("alice", "https://example.com/a").await.unwrap_err();
    assert!(matches!(err, Error::AlreadyAnalyzed(_)));
    assert_eq!(p.fetcher.calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn fetch_failure_is_reported_and_nothing_stored() {
    let p = Pipeline::new(
      Arc::new(MemoryStore::default()),
      Arc::new(StubFetcher { fail: true, ..Default::default() }),
      Arc::new(FixedClassifier(0.9)),
    );
    let err = p.analyze("alice", "https://example.com/a").await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
    assert!(p.history("alice").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn invalid_probability_is_an_inference_error() {
    for p_real in [f64::NAN, f64::INFINITY, -0.5, 1.5] {
      let p = pipeline(p_real);
      let err = p.analyze("alice", "https://example.com/a").await.unwrap_err();
      assert!(matches!(err, Error::Inference(_)), "{p_real} should be rejected");
      assert!(p.history("alice").await.unwrap().is_empty());
    }
  }

  #[tokio::test]
  async fn store_failure_is_reported() {
    let p = Pipeline::new(
      Arc::new(MemoryStore { offline: true, ..Default::default() }),
      Arc::new(StubFetcher::default()),
      Arc::new(FixedClassifier(0.9)),
    );
    let err = p.analyze("alice", "https://example.com/a").await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
  }

  // ── history / entry / clear ───────────────────────────────────────────────

  #[tokio::test]
  async fn history_is_newest_first() {
    let p = pipeline(0.7);
    p.analyze("alice", "https://example.com/1").await.unwrap();
    p.analyze("alice", "https://example.com/2").await.unwrap();
    let history = p.history("alice").await.unwrap();
    let indexes: Vec<_> = history.iter().map(|e| e.history_index).collect();
    assert_eq!(indexes, vec![2, 1]);
  }

  #[tokio::test]
  async fn entry_is_scoped_to_owner() {
    let p = pipeline(0.7);
    let entry = p.analyze("alice", "https://example.com/1").await.unwrap();
    assert_eq!(p.entry(entry.id, "alice").await.unwrap().id, entry.id);
    assert!(matches!(
      p.entry(entry.id, "mallory").await,
      Err(Error::EntryNotFound(id)) if id == entry.id
    ));
  }

  #[tokio::test]
  async fn clear_then_list_is_empty() {
    let p = pipeline(0.7);
    p.analyze("alice", "https://example.com/1").await.unwrap();
    p.analyze("bob", "https://example.com/1").await.unwrap();

    assert_eq!(p.clear("alice").await.unwrap(), 1);
    assert!(p.history("alice").await.unwrap().is_empty());
    assert_eq!(p.history("bob").await.unwrap().len(), 1);
  }
}
