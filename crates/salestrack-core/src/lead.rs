//! Lead documents and the typed inputs that create or modify them.
//!
//! A lead is stored as one document: contact fields, an append-only list of
//! [`Interaction`]s, and the derived `score`/`category` pair. Clients never
//! set the derived pair; it is recomputed by the write path on every
//! mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Where a lead came from.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LeadSource {
  Website,
  Linkedin,
  Conference,
  ColdEmail,
  Referral,
  #[serde(alias = "Other")]
  Other,
}

/// Position of a lead in the sales pipeline.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LeadStatus {
  #[default]
  New,
  Contacted,
  Qualified,
  Negotiation,
  ClosedWon,
  ClosedLost,
}

/// Score tier. Only ever produced by [`crate::scoring::categorize`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
pub enum Category {
  Cold,
  Warm,
  Hot,
  Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionType {
  Email,
  Call,
  Meeting,
  Demo,
  FollowUp,
}

// ─── Interaction ─────────────────────────────────────────────────────────────

/// One contact event, embedded in its lead. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
  /// Normalised to UTC at ingestion. Undated interactions still count toward
  /// frequency but never toward recency.
  pub date:  Option<DateTime<Utc>>,
  #[serde(rename = "type")]
  pub kind:  InteractionType,
  pub notes: Option<String>,
  /// The team member responsible for the interaction.
  pub owner: Option<String>,
}

/// Body of an append-interaction request. Every field is optional so an
/// empty payload can be told apart from a malformed one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewInteraction {
  pub date:  Option<DateTime<Utc>>,
  #[serde(rename = "type")]
  pub kind:  Option<InteractionType>,
  pub notes: Option<String>,
  pub owner: Option<String>,
}

impl NewInteraction {
  pub fn is_empty(&self) -> bool {
    self.date.is_none()
      && self.kind.is_none()
      && self.notes.is_none()
      && self.owner.is_none()
  }
}

// ─── Lead ────────────────────────────────────────────────────────────────────

/// The client-controlled fields of a lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadFields {
  pub first_name:   String,
  pub last_name:    String,
  pub company:      String,
  /// Number of employees.
  pub company_size: u32,
  pub email:        String,
  pub phone:        Option<String>,
  pub job_title:    Option<String>,
  pub source:       LeadSource,
  #[serde(default)]
  pub status:       LeadStatus,
  #[serde(default)]
  pub interactions: Vec<Interaction>,
}

/// A persisted lead document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
  pub id:         Uuid,
  #[serde(flatten)]
  pub fields:     LeadFields,
  pub score:      f64,
  pub category:   Category,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Body of a create request. Fields left out here are also left out of the
/// merge when the request resolves to an existing lead.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLead {
  pub first_name:   String,
  pub last_name:    String,
  pub company:      String,
  pub company_size: u32,
  pub email:        String,
  pub phone:        Option<String>,
  pub job_title:    Option<String>,
  pub source:       LeadSource,
  pub status:       Option<LeadStatus>,
  pub interactions: Option<Vec<Interaction>>,
}

impl NewLead {
  /// The full field set for an insert; unset fields take their defaults.
  pub fn into_fields(self) -> LeadFields {
    LeadFields {
      first_name:   self.first_name,
      last_name:    self.last_name,
      company:      self.company,
      company_size: self.company_size,
      email:        self.email,
      phone:        self.phone,
      job_title:    self.job_title,
      source:       self.source,
      status:       self.status.unwrap_or_default(),
      interactions: self.interactions.unwrap_or_default(),
    }
  }

  /// Every field this request carries, as a patch over an existing lead.
  pub fn into_patch(self) -> LeadPatch {
    LeadPatch {
      first_name:   Some(self.first_name),
      last_name:    Some(self.last_name),
      company:      Some(self.company),
      company_size: Some(self.company_size),
      email:        Some(self.email),
      phone:        self.phone,
      job_title:    self.job_title,
      source:       Some(self.source),
      status:       self.status,
      interactions: self.interactions,
    }
  }
}

/// A typed partial update: `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LeadPatch {
  pub first_name:   Option<String>,
  pub last_name:    Option<String>,
  pub company:      Option<String>,
  pub company_size: Option<u32>,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  pub job_title:    Option<String>,
  pub source:       Option<LeadSource>,
  pub status:       Option<LeadStatus>,
  /// Replaces the whole list. Only a create that merges into an existing
  /// lead carries this; field updates never do.
  #[serde(skip)]
  pub interactions: Option<Vec<Interaction>>,
}

impl LeadPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Shallow merge: every field present in the patch wins.
  pub fn apply(&self, fields: &mut LeadFields) {
    fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
      if let Some(v) = value {
        *slot = v.clone();
      }
    }
    fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
      if value.is_some() {
        *slot = value.clone();
      }
    }

    set(&mut fields.first_name, &self.first_name);
    set(&mut fields.last_name, &self.last_name);
    set(&mut fields.company, &self.company);
    set(&mut fields.company_size, &self.company_size);
    set(&mut fields.email, &self.email);
    set_opt(&mut fields.phone, &self.phone);
    set_opt(&mut fields.job_title, &self.job_title);
    set(&mut fields.source, &self.source);
    set(&mut fields.status, &self.status);
    set(&mut fields.interactions, &self.interactions);
  }

  /// The merged view of `fields` with this patch applied.
  pub fn merged(&self, fields: &LeadFields) -> LeadFields {
    let mut merged = fields.clone();
    self.apply(&mut merged);
    merged
  }
}

// ─── Store-facing write records ──────────────────────────────────────────────

/// A scored lead ready for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct LeadDraft {
  pub fields:     LeadFields,
  pub score:      f64,
  pub category:   Category,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One atomic modification of a stored lead: `$set` the patch, optionally
/// `$push` one interaction, and set the freshly computed score.
#[derive(Debug, Clone)]
pub struct LeadUpdate {
  pub set:        LeadPatch,
  pub push:       Option<Interaction>,
  pub score:      f64,
  pub category:   Category,
  pub updated_at: DateTime<Utc>,
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Lead list filters. Name, company and title filters are case-insensitive
/// regular expressions; the rest match exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub status:     Option<LeadStatus>,
  pub source:     Option<LeadSource>,
  pub company:    Option<String>,
  pub job_title:  Option<String>,
  pub phone:      Option<String>,
}
