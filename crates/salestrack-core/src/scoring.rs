//! The lead scoring engine.
//!
//! A lead's score is the sum of six independently computed factors:
//!
//! | Factor                | Points |
//! |-----------------------|--------|
//! | Pipeline status       | 0–30   |
//! | Company size          | 0–25   |
//! | Interaction frequency | 0–20   |
//! | Job title relevance   | 0–15   |
//! | Source quality        | 0–5    |
//! | Interaction recency   | 0–5    |
//!
//! The engine is pure: the only time input is the `now` argument, so the
//! same snapshot and instant always produce the same score.

use chrono::{DateTime, Utc};

use crate::lead::{Category, Interaction, LeadFields, LeadSource, LeadStatus};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Title fragments that mark a decision maker.
const SENIOR_TITLE_KEYWORDS: &[&str] = &[
  "director",
  "vp",
  "ceo",
  "cto",
  "founder",
  "head of",
  "president",
  "chief",
];

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Read-only view of the scorable fields of a lead. Absent fields fall back
/// to defaults instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshot<'a> {
  /// Defaults to [`LeadStatus::New`].
  pub status:       Option<LeadStatus>,
  pub company_size: Option<u32>,
  pub interactions: &'a [Interaction],
  pub job_title:    Option<&'a str>,
  /// Defaults to [`LeadSource::ColdEmail`].
  pub source:       Option<LeadSource>,
}

impl<'a> From<&'a LeadFields> for Snapshot<'a> {
  fn from(fields: &'a LeadFields) -> Self {
    Self {
      status:       Some(fields.status),
      company_size: Some(fields.company_size),
      interactions: &fields.interactions,
      job_title:    fields.job_title.as_deref(),
      source:       Some(fields.source),
    }
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Score and categorise a snapshot in one step.
pub fn score_lead(snapshot: &Snapshot<'_>, now: DateTime<Utc>) -> (f64, Category) {
  let score = calculate_score(snapshot, now);
  (score, categorize(score))
}

/// Total score in `[0, 100]`.
pub fn calculate_score(snapshot: &Snapshot<'_>, now: DateTime<Utc>) -> f64 {
  let total = status_score(snapshot.status.unwrap_or_default())
    + company_size_score(snapshot.company_size.unwrap_or(0))
    + frequency_score(snapshot.interactions.len())
    + job_title_score(snapshot.job_title)
    + source_score(snapshot.source.unwrap_or(LeadSource::ColdEmail))
    + recency_score(snapshot.interactions, now);

  f64::from(total).clamp(MIN_SCORE, MAX_SCORE)
}

/// Upper tier boundaries are inclusive: 20 is Warm, 50 Hot, 80 Premium.
pub fn categorize(score: f64) -> Category {
  if score < 20.0 {
    Category::Cold
  } else if score < 50.0 {
    Category::Warm
  } else if score < 80.0 {
    Category::Hot
  } else {
    Category::Premium
  }
}

// ─── Factors ─────────────────────────────────────────────────────────────────

fn status_score(status: LeadStatus) -> u32 {
  match status {
    LeadStatus::New => 5,
    LeadStatus::Contacted => 10,
    LeadStatus::Qualified => 20,
    LeadStatus::Negotiation => 25,
    LeadStatus::ClosedWon => 30,
    LeadStatus::ClosedLost => 0,
  }
}

fn company_size_score(size: u32) -> u32 {
  match size {
    0 => 0,
    1..=50 => 5,
    51..=500 => 15,
    _ => 25,
  }
}

fn frequency_score(count: usize) -> u32 {
  match count {
    0 => 0,
    1 => 10,
    2..=3 => 15,
    4..=5 => 18,
    _ => 20,
  }
}

fn job_title_score(title: Option<&str>) -> u32 {
  let Some(title) = title.filter(|t| !t.is_empty()) else {
    return 0;
  };
  let title = title.to_lowercase();
  if SENIOR_TITLE_KEYWORDS.iter().any(|k| title.contains(k)) {
    15
  } else {
    10
  }
}

fn source_score(source: LeadSource) -> u32 {
  match source {
    LeadSource::Referral => 5,
    LeadSource::Conference => 4,
    LeadSource::Linkedin => 3,
    LeadSource::Website => 2,
    LeadSource::ColdEmail | LeadSource::Other => 1,
  }
}

/// Whole days since the most recent dated interaction. Future-dated
/// interactions count as zero days old.
fn recency_score(interactions: &[Interaction], now: DateTime<Utc>) -> u32 {
  let Some(latest) = interactions.iter().filter_map(|i| i.date).max() else {
    return 0;
  };
  match (now - latest).num_days().max(0) {
    0..=7 => 5,
    8..=30 => 3,
    31..=90 => 1,
    _ => 0,
  }
}
