//! [`SqliteStore`], the SQLite implementation of [`HistoryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension as _};
use tracing::debug;

use newsproof_core::{
  history::{EntryId, HistoryEntry, NewHistoryEntry},
  store::HistoryStore,
};

use crate::{
  Error, Result,
  encode::{ENTRY_COLUMNS, RawEntry, encode_article, encode_dt, encode_verdict},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A newsproof history store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == ErrorCode::ConstraintViolation
        && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = Error;

  async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
    let user = user_id.to_owned();

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ENTRY_COLUMNS} FROM history
           WHERE user_id = ?1
           ORDER BY history_index DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user], RawEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn get(&self, id: EntryId, user_id: &str) -> Result<Option<HistoryEntry>> {
    let user = user_id.to_owned();

    let raw: Option<RawEntry> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ENTRY_COLUMNS} FROM history WHERE id = ?1 AND user_id = ?2"),
              rusqlite::params![id, user],
              RawEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEntry::into_entry).transpose()
  }

  async fn insert(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
    let created_at = Utc::now();
    let created_at_str = encode_dt(created_at);
    let article_json = encode_article(&entry.article)?;
    let verdict_json = encode_verdict(&entry.verdict)?;
    let user = entry.user_id.clone();
    let url = entry.article.url.clone();

    // `None` means the (user, url) pair already exists.
    let assigned: Option<(EntryId, i64)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let history_index: i64 = tx.query_row(
          "SELECT COALESCE(MAX(history_index), 0) + 1 FROM history WHERE user_id = ?1",
          rusqlite::params![user],
          |r| r.get(0),
        )?;

        let inserted = tx.execute(
          "INSERT INTO history (
             user_id, url, history_index, created_at, article_json, verdict_json
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            user,
            url,
            history_index,
            created_at_str,
            article_json,
            verdict_json,
          ],
        );
        match inserted {
          Err(e) if is_unique_violation(&e) => return Ok(None),
          other => other?,
        };

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some((id, history_index)))
      })
      .await?;

    let Some((id, history_index)) = assigned else {
      debug!(user_id = %entry.user_id, url = %entry.article.url, "duplicate insert rejected");
      return Err(Error::Duplicate { url: entry.article.url });
    };

    Ok(HistoryEntry {
      id,
      input_by_user: entry.user_id,
      created_at,
      history_index,
      article: entry.article,
      ai_result: entry.verdict,
    })
  }

  async fn delete_all(&self, user_id: &str) -> Result<u64> {
    let user = user_id.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute("DELETE FROM history WHERE user_id = ?1", rusqlite::params![user])?;
        Ok(n as u64)
      })
      .await?;

    debug!(user_id, removed, "deleted history");
    Ok(removed)
  }
}
