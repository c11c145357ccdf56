//! Error type for `salestrack-store-sqlite`.

use salestrack_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to connect to the database: {0}")]
  Connection(#[source] tokio_rusqlite::Error),

  #[error("failed to create indexes: {0}")]
  IndexCreation(#[source] tokio_rusqlite::Error),

  #[error("failed to close the database connection: {0}")]
  Shutdown(#[source] tokio_rusqlite::Error),

  /// A write tripped a `UNIQUE` index.
  #[error("unique constraint violated: {0}")]
  DuplicateKey(String),

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {kind} value in column: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, msg)) = &e
      && failure.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Self::DuplicateKey(msg.clone().unwrap_or_else(|| failure.to_string()));
    }
    Self::Database(e)
  }
}

impl StoreError for Error {
  fn is_duplicate_key(&self) -> bool { matches!(self, Self::DuplicateKey(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
