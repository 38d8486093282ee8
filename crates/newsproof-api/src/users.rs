//! Handlers for `/users` endpoints.

use axum::{Json, extract::State};
use newsproof_core::{classify::Classifier, fetch::ArticleFetcher, store::HistoryStore};
use serde::Serialize;

use crate::{
  AppState,
  auth::AuthUser,
  error::{ApiError, Envelope},
};

#[derive(Debug, Serialize)]
pub struct Deleted {
  pub deleted: u64,
}

/// `DELETE /users/me`: purge everything stored for the caller.
///
/// Account records live with the identity provider; the only per-user data
/// kept here is the analysis history.
pub async fn delete_me<S, F, C>(
  State(state): State<AppState<S, F, C>>,
  AuthUser(user): AuthUser,
) -> Result<Json<Envelope<Deleted>>, ApiError>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  let deleted = state
    .pipeline
    .clear(&user)
    .await
    .map_err(ApiError::core("Failed to delete account data"))?;
  Ok(Envelope::ok(Deleted { deleted }))
}
