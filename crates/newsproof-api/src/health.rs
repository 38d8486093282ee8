//! `GET /healthz`, unauthenticated.

use axum::{Json, extract::State};
use newsproof_core::{classify::Classifier, fetch::ArticleFetcher, store::HistoryStore};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:  &'static str,
  pub service: String,
  pub version: &'static str,
}

pub async fn handler<S, F, C>(State(state): State<AppState<S, F, C>>) -> Json<Health>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  Json(Health {
    status:  "healthy",
    service: state.config.app_name.clone(),
    version: env!("CARGO_PKG_VERSION"),
  })
}
