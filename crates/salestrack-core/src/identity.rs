//! Lead identity resolution: does a create request name an existing lead?
//!
//! A request matches a stored lead when either its email or its phone is
//! already taken. Email and phone are each unique, so a single lead can match
//! both clauses, but two different leads can only match when the request
//! pairs one lead's email with another lead's phone. That pairing is reported
//! as [`Error::IdentityConflict`] rather than resolved in favour of either.

use crate::{
  Error, Result,
  lead::Lead,
  store::SalesStore,
};

/// Find the lead a request with `(email, phone)` refers to, if any.
pub async fn resolve<S: SalesStore>(
  store: &S,
  email: &str,
  phone: Option<&str>,
) -> Result<Option<Lead>> {
  let mut matches = store
    .find_leads_by_identity(email, phone)
    .await
    .map_err(Error::store)?;

  matches.dedup_by_key(|lead| lead.id);

  match matches.len() {
    0 => Ok(None),
    1 => Ok(matches.pop()),
    _ => {
      tracing::warn!(
        email,
        phone = phone.unwrap_or_default(),
        "lead identity matches more than one document"
      );
      Err(Error::IdentityConflict {
        email: email.to_owned(),
        phone: phone.unwrap_or_default().to_owned(),
      })
    }
  }
}
