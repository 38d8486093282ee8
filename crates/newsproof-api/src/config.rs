//! Runtime server configuration, deserialised from `config.toml` and
//! `NEWSPROOF_*` environment variables.

use std::{path::PathBuf, time::Duration};

use axum::http::{HeaderValue, request::Parts};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_app_name")]
  pub app_name:           String,
  #[serde(default)]
  pub debug:              bool,
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Directory holding `vectorizer.json` and `model.json`.
  #[serde(default = "default_model_dir")]
  pub model_dir:          PathBuf,
  #[serde(default = "default_true")]
  pub preload_model:      bool,
  /// HS256 secret shared with the identity provider.
  pub jwt_secret:         String,
  #[serde(default = "default_audience")]
  pub jwt_audience:       String,
  #[serde(default)]
  pub cors_origins:       Vec<String>,
  #[serde(default)]
  pub cors_origin_regex:  Option<String>,
  #[serde(default)]
  pub fetch_timeout_secs: Option<u64>,
  #[serde(default)]
  pub user_agent:         Option<String>,
}

fn default_app_name() -> String { "newsproof".into() }
fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/newsproof/history.db") }
fn default_model_dir() -> PathBuf { PathBuf::from("models") }
fn default_true() -> bool { true }
fn default_audience() -> String { "authenticated".into() }

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid CORS origin {0:?}")]
  InvalidOrigin(String),

  #[error("invalid CORS origin pattern: {0}")]
  InvalidOriginRegex(#[from] regex::Error),
}

impl ServerConfig {
  pub fn fetch_timeout(&self) -> Option<Duration> {
    self.fetch_timeout_secs.map(Duration::from_secs)
  }

  /// CORS policy: the listed origins plus anything matching
  /// `cors_origin_regex`, any method and header, credentials allowed.
  pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
    let origins = self
      .cors_origins
      .iter()
      .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidOrigin(o.clone())))
      .collect::<Result<Vec<_>, _>>()?;
    // The pattern must match the whole origin.
    let pattern = self
      .cors_origin_regex
      .as_deref()
      .map(|p| Regex::new(&format!("^(?:{p})$")))
      .transpose()?;

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
      origins.contains(origin)
        || pattern
          .as_ref()
          .zip(origin.to_str().ok())
          .is_some_and(|(re, o)| re.is_match(o))
    });

    Ok(
      CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true),
    )
  }
}
