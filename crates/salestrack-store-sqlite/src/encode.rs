//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enumerations are stored as
//! their serde names. Interactions are stored as one compact JSON array. UUIDs
//! are stored as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use salestrack_core::{
  lead::{Category, Interaction, Lead, LeadFields, LeadSource, LeadStatus},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every `SELECT`/`RETURNING` over `leads`; the order
/// matches [`read_lead`].
pub const LEAD_COLUMNS: &str = "lead_id, first_name, last_name, company, company_size, email, \
                                phone, job_title, source, status, interactions, score, category, \
                                created_at, updated_at";

/// Column list for `users`; the order matches [`read_user`].
pub const USER_COLUMNS: &str = "user_id, name, email, age";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

fn decode_variant<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::UnknownVariant { kind, value: s.to_owned() })
}

pub fn decode_source(s: &str) -> Result<LeadSource> { decode_variant("source", s) }

pub fn decode_status(s: &str) -> Result<LeadStatus> { decode_variant("status", s) }

pub fn decode_category(s: &str) -> Result<Category> { decode_variant("category", s) }

// ─── Interactions ────────────────────────────────────────────────────────────

pub fn encode_interactions(interactions: &[Interaction]) -> Result<String> {
  Ok(serde_json::to_string(interactions)?)
}

pub fn encode_interaction(interaction: &Interaction) -> Result<String> {
  Ok(serde_json::to_string(interaction)?)
}

pub fn decode_interactions(s: &str) -> Result<Vec<Interaction>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `leads` row.
pub struct RawLead {
  pub lead_id:      String,
  pub first_name:   String,
  pub last_name:    String,
  pub company:      String,
  pub company_size: u32,
  pub email:        String,
  pub phone:        Option<String>,
  pub job_title:    Option<String>,
  pub source:       String,
  pub status:       String,
  pub interactions: String,
  pub score:        f64,
  pub category:     String,
  pub created_at:   String,
  pub updated_at:   String,
}

pub fn read_lead(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLead> {
  Ok(RawLead {
    lead_id:      row.get(0)?,
    first_name:   row.get(1)?,
    last_name:    row.get(2)?,
    company:      row.get(3)?,
    company_size: row.get(4)?,
    email:        row.get(5)?,
    phone:        row.get(6)?,
    job_title:    row.get(7)?,
    source:       row.get(8)?,
    status:       row.get(9)?,
    interactions: row.get(10)?,
    score:        row.get(11)?,
    category:     row.get(12)?,
    created_at:   row.get(13)?,
    updated_at:   row.get(14)?,
  })
}

impl RawLead {
  pub fn into_lead(self) -> Result<Lead> {
    Ok(Lead {
      id:         decode_uuid(&self.lead_id)?,
      fields:     LeadFields {
        first_name:   self.first_name,
        last_name:    self.last_name,
        company:      self.company,
        company_size: self.company_size,
        email:        self.email,
        phone:        self.phone,
        job_title:    self.job_title,
        source:       decode_source(&self.source)?,
        status:       decode_status(&self.status)?,
        interactions: decode_interactions(&self.interactions)?,
      },
      score:      self.score,
      category:   decode_category(&self.category)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id: String,
  pub name:    String,
  pub email:   String,
  pub age:     u32,
}

pub fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id: row.get(0)?,
    name:    row.get(1)?,
    email:   row.get(2)?,
    age:     row.get(3)?,
  })
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:    decode_uuid(&self.user_id)?,
      name:  self.name,
      email: self.email,
      age:   self.age,
    })
  }
}
