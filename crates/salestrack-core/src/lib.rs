//! Core types, the lead scoring engine, and the write-path services for the
//! salestrack backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! store is reached through the [`store::SalesStore`] trait; backends live in
//! their own crates.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod error;
pub mod identity;
pub mod lead;
pub mod scoring;
pub mod service;
pub mod store;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
