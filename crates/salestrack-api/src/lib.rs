//! JSON REST API for salestrack.
//!
//! Exposes an axum [`Router`] backed by any [`SalesStore`]. CORS, tracing
//! layers and the listener are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", salestrack_api::api_router(store.clone(), clock))
//! ```

pub mod error;
pub mod leads;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use salestrack_core::{clock::Clock, store::SalesStore};

pub use error::ApiError;

/// Response header carrying the number of documents matching a list query,
/// independent of `skip`/`limit`.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), clock: Arc::clone(&self.clock) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Router<()>
where
  S: SalesStore + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete::<S>),
    )
    // Leads
    .route("/leads", get(leads::list::<S>).post(leads::create::<S>))
    .route(
      "/leads/{id}",
      get(leads::get_one::<S>)
        .put(leads::update::<S>)
        .delete(leads::delete::<S>),
    )
    .route("/leads/{id}/interactions", post(leads::add_interaction::<S>))
    .with_state(ApiState { store, clock })
}

#[cfg(test)]
mod tests;
