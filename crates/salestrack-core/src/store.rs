//! The `SalesStore` trait and supporting query types.
//!
//! The trait models a document store with two collections, `users` and
//! `leads`. It is implemented by storage backends (e.g.
//! `salestrack-store-sqlite`); the services in [`crate::service`] depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  lead::{Lead, LeadDraft, LeadFilter, LeadUpdate},
  user::{NewUser, User, UserFilter, UserPatch},
};

pub const DEFAULT_LIMIT: u64 = 100;

// ─── Query type ──────────────────────────────────────────────────────────────

/// `skip`/`limit` window for list reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub skip:  u64,
  pub limit: u64,
}

impl Default for Page {
  fn default() -> Self { Self { skip: 0, limit: DEFAULT_LIMIT } }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Backend errors must say whether a write tripped a unique index, so that
/// races past the services' own pre-checks still surface as conflicts.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_duplicate_key(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a salestrack store backend.
///
/// Every `update_*` and `delete_*` method is a single atomic find-and-modify
/// returning the document after (or, for deletes, before) the change, or
/// `None` when no document has that id.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SalesStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Insert a user; the store assigns its id. Fails with a duplicate-key
  /// error if the email is taken.
  fn insert_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn find_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// `$set` every field present in `patch`.
  fn update_user(
    &self,
    id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn count_users<'a>(
    &'a self,
    filter: &'a UserFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  fn list_users<'a>(
    &'a self,
    filter: &'a UserFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  // ── Leads ─────────────────────────────────────────────────────────────

  /// Insert a scored lead; the store assigns its id. Fails with a
  /// duplicate-key error if the email or phone is taken.
  fn insert_lead(
    &self,
    draft: LeadDraft,
  ) -> impl Future<Output = Result<Lead, Self::Error>> + Send + '_;

  fn find_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  /// Leads whose email equals `email` OR, when given, whose phone equals
  /// `phone`, in one query. Returns at most two documents.
  fn find_leads_by_identity<'a>(
    &'a self,
    email: &'a str,
    phone: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + 'a;

  /// Apply a [`LeadUpdate`] as one atomic operation.
  fn update_lead(
    &self,
    id: Uuid,
    update: LeadUpdate,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  fn delete_lead(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Lead>, Self::Error>> + Send + '_;

  fn count_leads<'a>(
    &'a self,
    filter: &'a LeadFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  fn list_leads<'a>(
    &'a self,
    filter: &'a LeadFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Lead>, Self::Error>> + Send + 'a;
}
