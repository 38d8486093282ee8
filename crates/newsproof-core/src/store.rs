//! The `HistoryStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `newsproof-store-sqlite`). The pipeline and the HTTP layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::history::{EntryId, HistoryEntry, NewHistoryEntry};

/// Errors produced by a [`HistoryStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when an insert was rejected because the user already has an entry
  /// for the same article URL.
  fn is_duplicate(&self) -> bool;
}

/// Abstraction over a per-user history backend.
///
/// Every operation is scoped to a single user id; a backend must never return
/// one user's entries to another.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait HistoryStore: Send + Sync {
  type Error: StoreError;

  /// All entries owned by `user_id`, newest first.
  fn list<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + 'a;

  /// A single entry, or `None` if it does not exist or belongs to someone
  /// else.
  fn get<'a>(
    &'a self,
    id: EntryId,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<HistoryEntry>, Self::Error>> + Send + 'a;

  /// Persist a new entry and return it with its assigned id, timestamp and
  /// sequence number.
  fn insert(
    &self,
    entry: NewHistoryEntry,
  ) -> impl Future<Output = Result<HistoryEntry, Self::Error>> + Send + '_;

  /// Delete every entry owned by `user_id`, returning how many were removed.
  fn delete_all<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
