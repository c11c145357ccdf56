//! salestrack server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `SALESTRACK_*` environment overrides, connects the SQLite store, and
//! serves the JSON API until SIGINT/SIGTERM.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use salestrack_core::clock::SystemClock;
use salestrack_server::{app, cors_layer, expand_tilde, load_config};
use salestrack_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Sales tracking API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // `.env` is optional.
  dotenvy::dotenv().ok();

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = load_config(&cli.config, None).context("failed to load configuration")?;
  let cors = cors_layer(&server_cfg.cors_origins).context("invalid CORS origin")?;

  // Connect the store; nothing is served without it.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::connect(&store_path)
    .await
    .inspect_err(|e| {
      tracing::error!(error = %e, path = %store_path.display(), "store connect failed");
    })
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = %store_path.display(), "connected to store");

  let handle = store.clone();
  let app = app(Arc::new(store), Arc::new(SystemClock), cors);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(project = %server_cfg.project_name, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  handle
    .close()
    .await
    .inspect_err(|e| tracing::error!(error = %e, "store close failed"))
    .context("failed to close store")?;
  tracing::info!("store closed");

  Ok(())
}

/// Resolve on SIGINT, or on SIGTERM where available.
async fn shutdown_signal() {
  #[cfg(unix)]
  {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sigterm) => {
        tokio::select! {
          _ = sigterm.recv() => {}
          _ = tokio::signal::ctrl_c() => {}
        }
      }
      Err(e) => {
        tracing::warn!(error = %e, "cannot listen for SIGTERM");
        let _ = tokio::signal::ctrl_c().await;
      }
    }
  }
  #[cfg(not(unix))]
  {
    let _ = tokio::signal::ctrl_c().await;
  }
  tracing::info!("shutdown signal received, draining connections");
}
