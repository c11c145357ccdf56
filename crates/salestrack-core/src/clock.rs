//! The source of "now" for server-set timestamps and recency scoring.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock pinned to one instant; used by tests that assert on recency.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}
