//! SQLite backend for the salestrack store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each user and lead is one row; a
//! lead's interactions live in a JSON array column.

mod encode;
mod functions;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
