//! Field-level input validation shared by the services.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
  Error, Result,
  lead::{LeadFilter, LeadPatch, NewLead},
  user::{NewUser, UserPatch},
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern compiles")
});

static PHONE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[0-9]{1,15}$").expect("phone pattern compiles"));

const LEAD_TEXT_LEN: (usize, usize) = (2, 100);
const USER_NAME_LEN: (usize, usize) = (2, 50);
const USER_AGE: (u32, u32) = (1, 120);

fn length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<()> {
  let len = value.chars().count();
  if len < min || len > max {
    return Err(Error::Validation(format!(
      "{field} must be between {min} and {max} characters"
    )));
  }
  Ok(())
}

fn email(value: &str) -> Result<()> {
  if EMAIL.is_match(value) {
    Ok(())
  } else {
    Err(Error::Validation(format!("{value:?} is not a valid email address")))
  }
}

fn phone(value: &str) -> Result<()> {
  if PHONE.is_match(value) {
    Ok(())
  } else {
    Err(Error::Validation(format!("{value:?} is not a valid phone number")))
  }
}

fn company_size(value: u32) -> Result<()> {
  if value == 0 {
    return Err(Error::Validation("company_size must be greater than 0".into()));
  }
  Ok(())
}

fn age(value: u32) -> Result<()> {
  let (min, max) = USER_AGE;
  if !(min..=max).contains(&value) {
    return Err(Error::Validation(format!("age must be between {min} and {max}")));
  }
  Ok(())
}

fn pattern(field: &str, value: &str) -> Result<()> {
  Regex::new(value)
    .map(|_| ())
    .map_err(|e| Error::Validation(format!("invalid {field} filter: {e}")))
}

// ─── Leads ───────────────────────────────────────────────────────────────────

pub fn new_lead(input: &NewLead) -> Result<()> {
  length("first_name", &input.first_name, LEAD_TEXT_LEN)?;
  length("last_name", &input.last_name, LEAD_TEXT_LEN)?;
  length("company", &input.company, LEAD_TEXT_LEN)?;
  company_size(input.company_size)?;
  email(&input.email)?;
  if let Some(p) = &input.phone {
    phone(p)?;
  }
  Ok(())
}

pub fn lead_patch(patch: &LeadPatch) -> Result<()> {
  if let Some(v) = &patch.first_name {
    length("first_name", v, LEAD_TEXT_LEN)?;
  }
  if let Some(v) = &patch.last_name {
    length("last_name", v, LEAD_TEXT_LEN)?;
  }
  if let Some(v) = &patch.company {
    length("company", v, LEAD_TEXT_LEN)?;
  }
  if let Some(v) = patch.company_size {
    company_size(v)?;
  }
  if let Some(v) = &patch.email {
    email(v)?;
  }
  if let Some(v) = &patch.phone {
    phone(v)?;
  }
  Ok(())
}

pub fn lead_filter(filter: &LeadFilter) -> Result<()> {
  let patterns = [
    ("first_name", &filter.first_name),
    ("last_name", &filter.last_name),
    ("company", &filter.company),
    ("job_title", &filter.job_title),
  ];
  for (field, value) in patterns {
    if let Some(v) = value {
      pattern(field, v)?;
    }
  }
  Ok(())
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub fn new_user(input: &NewUser) -> Result<()> {
  length("name", &input.name, USER_NAME_LEN)?;
  email(&input.email)?;
  age(input.age)
}

pub fn user_patch(patch: &UserPatch) -> Result<()> {
  if let Some(v) = &patch.name {
    length("name", v, USER_NAME_LEN)?;
  }
  if let Some(v) = &patch.email {
    email(v)?;
  }
  if let Some(v) = patch.age {
    age(v)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lead::LeadSource;

  fn lead() -> NewLead {
    NewLead {
      first_name:   "Jane".into(),
      last_name:    "Doe".into(),
      company:      "TechCorp".into(),
      company_size: 250,
      email:        "jane@techcorp.com".into(),
      phone:        Some("+15551234567".into()),
      job_title:    None,
      source:       LeadSource::Website,
      status:       None,
      interactions: None,
    }
  }

  #[test]
  fn accepts_a_well_formed_lead() {
    assert!(new_lead(&lead()).is_ok());
  }

  #[test]
  fn rejects_short_names_and_zero_company_size() {
    let mut input = lead();
    input.first_name = "J".into();
    assert!(matches!(new_lead(&input), Err(Error::Validation(_))));

    let mut input = lead();
    input.company_size = 0;
    assert!(matches!(new_lead(&input), Err(Error::Validation(_))));
  }

  #[test]
  fn rejects_malformed_contact_details() {
    let mut input = lead();
    input.email = "not-an-email".into();
    assert!(new_lead(&input).is_err());

    let mut input = lead();
    input.phone = Some("555-1234".into());
    assert!(new_lead(&input).is_err());

    let mut input = lead();
    input.phone = Some("1234567890123456".into());
    assert!(new_lead(&input).is_err());
  }

  #[test]
  fn rejects_invalid_filter_patterns() {
    let filter = LeadFilter { company: Some("(unclosed".into()), ..LeadFilter::default() };
    assert!(matches!(lead_filter(&filter), Err(Error::Validation(_))));
    let filter = LeadFilter { company: Some("^Tech".into()), ..LeadFilter::default() };
    assert!(lead_filter(&filter).is_ok());
  }

  #[test]
  fn user_age_is_bounded() {
    let user = NewUser { name: "John Doe".into(), email: "john@example.com".into(), age: 121 };
    assert!(new_user(&user).is_err());
    let patch = UserPatch { age: Some(30), ..UserPatch::default() };
    assert!(user_patch(&patch).is_ok());
  }
}
