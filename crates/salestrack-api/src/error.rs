//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use salestrack_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::Validation(m) => Self::BadRequest(m),
      CoreError::LeadNotFound(_) | CoreError::UserNotFound(_) => Self::NotFound(e.to_string()),
      CoreError::LeadAlreadyExists(_)
      | CoreError::UserAlreadyExists(_)
      | CoreError::IdentityConflict { .. } => Self::Conflict(e.to_string()),
      CoreError::Store(inner) => Self::Store(inner),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { Self::BadRequest(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { Self::BadRequest(e.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(e: QueryRejection) -> Self { Self::BadRequest(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
