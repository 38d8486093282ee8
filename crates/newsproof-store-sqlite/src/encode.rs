//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Articles and verdicts are compact JSON.

use chrono::{DateTime, Utc};
use newsproof_core::{
  article::Article,
  history::{EntryId, HistoryEntry},
  verdict::Verdict,
};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_article(a: &Article) -> Result<String> { Ok(serde_json::to_string(a)?) }

/// JSON has no NaN or infinity; `serde_json` would write `null` and the row
/// could never be read back.
pub fn encode_verdict(v: &Verdict) -> Result<String> {
  if !v.truthness_score.is_finite() {
    return Err(Error::NonFiniteScore(v.truthness_score));
  }
  Ok(serde_json::to_string(v)?)
}

/// Columns selected by every history read, in [`RawEntry::from_row`] order.
pub const ENTRY_COLUMNS: &str =
  "id, user_id, created_at, history_index, article_json, verdict_json";

/// Raw values read directly from a `history` row.
pub struct RawEntry {
  pub id:            EntryId,
  pub user_id:       String,
  pub created_at:    String,
  pub history_index: i64,
  pub article_json:  String,
  pub verdict_json:  String,
}

impl RawEntry {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      user_id:       row.get(1)?,
      created_at:    row.get(2)?,
      history_index: row.get(3)?,
      article_json:  row.get(4)?,
      verdict_json:  row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
      id:            self.id,
      input_by_user: self.user_id,
      created_at:    decode_dt(&self.created_at)?,
      history_index: self.history_index,
      article:       serde_json::from_str(&self.article_json)?,
      ai_result:     serde_json::from_str(&self.verdict_json)?,
    })
  }
}
