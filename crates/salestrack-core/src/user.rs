//! Users — a plain CRUD resource with a unique email and no scoring.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
  pub age:   u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub name:  String,
  pub email: String,
  pub age:   u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
  pub name:  Option<String>,
  pub email: Option<String>,
  pub age:   Option<u32>,
}

impl UserPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
  /// Only users at least this old.
  pub min_age: Option<u32>,
}
