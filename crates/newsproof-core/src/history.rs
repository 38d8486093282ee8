//! History entries, one per analysed (user, URL) pair.
//!
//! Entries are created on submission, read many times, and deleted en masse
//! when the owner clears their history. They are never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{article::Article, verdict::Verdict};

/// Store-assigned primary key of a history entry.
pub type EntryId = i64;

/// A persisted analysis owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub id:            EntryId,
  /// The `sub` claim of the submitting user.
  pub input_by_user: String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:    DateTime<Utc>,
  /// Per-user sequence number, starting at 1 and strictly increasing.
  pub history_index: i64,
  pub article:       Article,
  pub ai_result:     Verdict,
}

/// Input to [`crate::store::HistoryStore::insert`].
/// `id`, `created_at` and `history_index` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
  pub user_id: String,
  pub article: Article,
  pub verdict: Verdict,
}
