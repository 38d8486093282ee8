//! Handlers for `/articles` endpoints.
//!
//! | Method   | Path                 | Notes |
//! |----------|----------------------|-------|
//! | `POST`   | `/articles/analyze`  | Body: `{"url":"https://..."}`; 409 if already analyzed |
//! | `GET`    | `/articles/history`  | Newest first |
//! | `DELETE` | `/articles/history`  | Returns `[]` |
//! | `GET`    | `/articles/{id}`     | 404 if missing or not the caller's |

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use newsproof_core::{
  classify::Classifier,
  fetch::ArticleFetcher,
  history::{EntryId, HistoryEntry},
  store::HistoryStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::AuthUser,
  error::{ApiError, Envelope},
};

// ─── Analyze ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
  pub url: String,
}

/// `POST /articles/analyze`
pub async fn analyze<S, F, C>(
  State(state): State<AppState<S, F, C>>,
  AuthUser(user): AuthUser,
  body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<Envelope<HistoryEntry>>, ApiError>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  let Json(body) = body?;
  let entry = state
    .pipeline
    .analyze(&user, &body.url)
    .await
    .map_err(ApiError::core("Failed to save article analysis"))?;
  Ok(Envelope::ok(entry))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /articles/history`
pub async fn history<S, F, C>(
  State(state): State<AppState<S, F, C>>,
  AuthUser(user): AuthUser,
) -> Result<Json<Envelope<Vec<HistoryEntry>>>, ApiError>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  let entries = state
    .pipeline
    .history(&user)
    .await
    .map_err(ApiError::core("Failed to retrieve article history"))?;
  Ok(Envelope::ok(entries))
}

/// `DELETE /articles/history`
pub async fn clear_history<S, F, C>(
  State(state): State<AppState<S, F, C>>,
  AuthUser(user): AuthUser,
) -> Result<Json<Envelope<Vec<HistoryEntry>>>, ApiError>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  state
    .pipeline
    .clear(&user)
    .await
    .map_err(ApiError::core("Failed to clear article history"))?;
  Ok(Envelope::ok(Vec::new()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /articles/{id}`
pub async fn get_one<S, F, C>(
  State(state): State<AppState<S, F, C>>,
  AuthUser(user): AuthUser,
  id: Result<Path<EntryId>, PathRejection>,
) -> Result<Json<Envelope<HistoryEntry>>, ApiError>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  let Path(id) = id?;
  let entry = state
    .pipeline
    .entry(id, &user)
    .await
    .map_err(ApiError::core("Failed to retrieve article"))?;
  Ok(Envelope::ok(entry))
}
