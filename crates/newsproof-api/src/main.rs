//! newsproof API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `NEWSPROOF_*` environment variables, loads the reliability model, opens the
//! SQLite history store and serves the JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use newsproof_api::{AppState, AuthConfig, ServerConfig};
use newsproof_core::pipeline::Pipeline;
use newsproof_fetch::{FetcherConfig, HttpFetcher};
use newsproof_model::ModelHandle;
use newsproof_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "newsproof article reliability API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "NEWSPROOF_CONFIG", default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("NEWSPROOF")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Initialise tracing.
  let default_level = if server_cfg.debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  // Load the model up front so missing artifacts fail at startup.
  let model_dir = expand_tilde(&server_cfg.model_dir);
  let model = ModelHandle::new(&model_dir);
  if server_cfg.preload_model {
    model
      .preload()
      .with_context(|| format!("failed to load model from {model_dir:?}"))?;
  }

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let fetcher = HttpFetcher::new(&FetcherConfig {
    timeout:    server_cfg.fetch_timeout(),
    user_agent: server_cfg.user_agent.clone(),
  })
  .context("failed to build article fetcher")?;

  let cors = server_cfg.cors_layer().context("invalid CORS settings")?;

  // Build application state.
  let state = AppState {
    pipeline: Pipeline::new(Arc::new(store), Arc::new(fetcher), Arc::new(model)),
    auth:     Arc::new(AuthConfig::hs256(
      &server_cfg.jwt_secret,
      &server_cfg.jwt_audience,
    )),
    config:   Arc::new(server_cfg.clone()),
  };

  let app = newsproof_api::app(state, cors);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(service = %server_cfg.app_name, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
