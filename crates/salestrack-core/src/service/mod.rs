//! Write-path and read-path services over a [`crate::store::SalesStore`].
//!
//! Services take the store by reference and the current instant by value,
//! so callers control both (the HTTP layer passes its configured clock).

pub mod leads;
pub mod users;
