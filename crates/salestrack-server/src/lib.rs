//! HTTP server assembly for salestrack.
//!
//! Loads [`ServerConfig`], builds the CORS policy and mounts
//! [`salestrack_api::api_router`] under `/api/v1`. The binary in `main.rs`
//! owns the store lifecycle.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  http::{HeaderName, HeaderValue, header::InvalidHeaderValue},
};
use salestrack_api::TOTAL_COUNT_HEADER;
use salestrack_core::{clock::Clock, store::SalesStore};
use serde::Deserialize;
use tower_http::{
  cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

/// Prefix for environment overrides, e.g. `SALESTRACK_PORT=9000`.
pub const ENV_PREFIX: &str = "SALESTRACK";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment. Every key has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  pub cors_origins: Vec<String>,
  pub project_name: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "0.0.0.0".to_string(),
      port:         8000,
      store_path:   PathBuf::from("salestrack.db"),
      cors_origins: vec!["http://localhost:3000".to_string()],
      project_name: "Sales Tracker API".to_string(),
    }
  }
}

/// Read `path` (optional) and then `SALESTRACK_*` variables on top.
///
/// `env` replaces the process environment when given; `cors_origins` is read
/// from the environment as a comma-separated list.
pub fn load_config(
  path: &Path,
  env: Option<config::Map<String, String>>,
) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins")
        .source(env),
    )
    .build()?
    .try_deserialize()
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// CORS for the configured origins, with credentials. Methods and headers are
/// mirrored from the preflight request, and the total-count header is exposed
/// to scripts.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
  let origins = origins
    .iter()
    .map(|o| o.parse::<HeaderValue>())
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_credentials(true)
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
      .expose_headers([HeaderName::from_static(TOTAL_COUNT_HEADER)]),
  )
}

/// The full application: the API under `/api/v1`, request tracing and CORS.
pub fn app<S>(store: Arc<S>, clock: Arc<dyn Clock>, cors: CorsLayer) -> Router
where
  S: SalesStore + 'static,
{
  Router::new()
    .nest("/api/v1", salestrack_api::api_router(store, clock))
    .layer(TraceLayer::new_for_http())
    .layer(cors)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
