//! JSON REST API for newsproof.
//!
//! Exposes an axum [`Router`] backed by a [`Pipeline`] over any
//! [`HistoryStore`], [`ArticleFetcher`] and [`Classifier`]. Every route
//! under `/api/v1` requires a bearer token; `/healthz` does not.

pub mod articles;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use newsproof_core::{
  classify::Classifier, fetch::ArticleFetcher, pipeline::Pipeline, store::HistoryStore,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use auth::AuthConfig;
pub use config::ServerConfig;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, F, C> {
  pub pipeline: Pipeline<S, F, C>,
  pub config:   Arc<ServerConfig>,
  pub auth:     Arc<AuthConfig>,
}

impl<S, F, C> Clone for AppState<S, F, C> {
  fn clone(&self) -> Self {
    Self {
      pipeline: self.pipeline.clone(),
      config:   Arc::clone(&self.config),
      auth:     Arc::clone(&self.auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Routes mounted under `/api/v1`.
pub fn api_router<S, F, C>() -> Router<AppState<S, F, C>>
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  Router::new()
    // Articles
    .route("/articles/analyze", post(articles::analyze::<S, F, C>))
    .route(
      "/articles/history",
      get(articles::history::<S, F, C>).delete(articles::clear_history::<S, F, C>),
    )
    .route("/articles/{id}", get(articles::get_one::<S, F, C>))
    // Users
    .route("/users/me", delete(users::delete_me::<S, F, C>))
}

/// Build the full application router for `state`, without CORS.
pub fn router<S, F, C>(state: AppState<S, F, C>) -> Router
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  Router::new()
    .route("/healthz", get(health::handler::<S, F, C>))
    .nest("/api/v1", api_router())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// [`router`] wrapped in the configured CORS policy.
pub fn app<S, F, C>(state: AppState<S, F, C>, cors: CorsLayer) -> Router
where
  S: HistoryStore + 'static,
  F: ArticleFetcher + 'static,
  C: Classifier + 'static,
{
  router(state).layer(cors)
}

// ─── Integration tests ────────────────────────────────────────────────────────
