//! Error types for `salestrack-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  /// Empty or malformed input, rejected before the store is touched.
  #[error("{0}")]
  Validation(String),

  #[error("lead not found: {0}")]
  LeadNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("lead with email {0} already exists")]
  LeadAlreadyExists(String),

  #[error("user with email {0} already exists")]
  UserAlreadyExists(String),

  /// The email and the phone of one request identify two different leads.
  #[error("email {email} and phone {phone} belong to different leads")]
  IdentityConflict { email: String, phone: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E: StoreError>(e: E) -> Self { Self::Store(Box::new(e)) }

  /// Map a failed lead write: unique-index violations become
  /// [`Error::LeadAlreadyExists`], everything else is a store fault.
  pub(crate) fn lead_write<E: StoreError>(e: E, email: &str) -> Self {
    if e.is_duplicate_key() {
      Self::LeadAlreadyExists(email.to_owned())
    } else {
      Self::store(e)
    }
  }

  /// Same as [`Error::lead_write`] for the users collection.
  pub(crate) fn user_write<E: StoreError>(e: E, email: &str) -> Self {
    if e.is_duplicate_key() {
      Self::UserAlreadyExists(email.to_owned())
    } else {
      Self::store(e)
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
