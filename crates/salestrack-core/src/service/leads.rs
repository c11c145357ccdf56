//! The lead write coordinator and the lead read operations.
//!
//! Every mutation follows the same shape: read the current document, build a
//! merged snapshot (current fields overlaid with the incoming change), score
//! the snapshot, then persist the change together with the new score and
//! category in one atomic store operation.
//!
//! Two concurrent writers to the same lead can still lose an update: the
//! read and the write are separate store round trips. What never happens is
//! a persisted score that disagrees with the fields written alongside it by
//! the same request.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Error, Result, identity,
  lead::{Interaction, Lead, LeadDraft, LeadFilter, LeadPatch, LeadUpdate, NewInteraction, NewLead},
  scoring::{Snapshot, score_lead},
  store::{Page, SalesStore},
  validate,
};

// ─── Writes ──────────────────────────────────────────────────────────────────

/// Create a lead, or merge into the lead that already owns the email or
/// phone. A resubmitted lead updates the stored record; it never fails as a
/// duplicate unless it loses an insert race.
pub async fn create_or_merge<S: SalesStore>(
  store: &S,
  now: DateTime<Utc>,
  input: NewLead,
) -> Result<Lead> {
  validate::new_lead(&input)?;

  let email = input.email.clone();
  let existing = identity::resolve(store, &input.email, input.phone.as_deref()).await?;

  match existing {
    Some(current) => {
      let set = input.into_patch();
      let merged = set.merged(&current.fields);
      let (score, category) = score_lead(&Snapshot::from(&merged), now);

      let lead = store
        .update_lead(current.id, LeadUpdate { set, push: None, score, category, updated_at: now })
        .await
        .map_err(|e| Error::lead_write(e, &email))?
        .ok_or(Error::LeadNotFound(current.id))?;

      tracing::info!(lead_id = %lead.id, score, %category, "merged lead into existing record");
      Ok(lead)
    }
    None => {
      let fields = input.into_fields();
      let (score, category) = score_lead(&Snapshot::from(&fields), now);

      let draft = LeadDraft { fields, score, category, created_at: now, updated_at: now };
      let lead = store
        .insert_lead(draft)
        .await
        .map_err(|e| Error::lead_write(e, &email))?;

      tracing::info!(lead_id = %lead.id, score, %category, "created lead");
      Ok(lead)
    }
  }
}

/// Apply a partial update to a lead and rescore it.
pub async fn update_fields<S: SalesStore>(
  store: &S,
  now: DateTime<Utc>,
  id: Uuid,
  patch: LeadPatch,
) -> Result<Lead> {
  if patch.is_empty() {
    return Err(Error::Validation("No update fields provided".into()));
  }
  validate::lead_patch(&patch)?;

  let current = get_lead(store, id).await?;
  let merged = patch.merged(&current.fields);
  let (score, category) = score_lead(&Snapshot::from(&merged), now);

  let lead = store
    .update_lead(id, LeadUpdate { set: patch, push: None, score, category, updated_at: now })
    .await
    .map_err(|e| Error::lead_write(e, &merged.email))?
    .ok_or(Error::LeadNotFound(id))?;

  tracing::info!(lead_id = %id, score, %category, "updated lead");
  Ok(lead)
}

/// Append one interaction to a lead and rescore it over the full history.
pub async fn append_interaction<S: SalesStore>(
  store: &S,
  now: DateTime<Utc>,
  id: Uuid,
  input: NewInteraction,
) -> Result<Lead> {
  if input.is_empty() {
    return Err(Error::Validation("No interaction data provided".into()));
  }
  let Some(kind) = input.kind else {
    return Err(Error::Validation("interaction type is required".into()));
  };
  let interaction = Interaction {
    date: input.date,
    kind,
    notes: input.notes,
    owner: input.owner,
  };

  let current = get_lead(store, id).await?;
  let mut merged = current.fields;
  merged.interactions.push(interaction.clone());
  let (score, category) = score_lead(&Snapshot::from(&merged), now);

  let update = LeadUpdate {
    set: LeadPatch::default(),
    push: Some(interaction),
    score,
    category,
    updated_at: now,
  };
  let lead = store
    .update_lead(id, update)
    .await
    .map_err(Error::store)?
    .ok_or(Error::LeadNotFound(id))?;

  tracing::info!(
    lead_id = %id,
    interactions = lead.fields.interactions.len(),
    score,
    %category,
    "recorded lead interaction"
  );
  Ok(lead)
}

pub async fn delete_lead<S: SalesStore>(store: &S, id: Uuid) -> Result<Lead> {
  let lead = store
    .delete_lead(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::LeadNotFound(id))?;
  tracing::info!(lead_id = %id, "deleted lead");
  Ok(lead)
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub async fn get_lead<S: SalesStore>(store: &S, id: Uuid) -> Result<Lead> {
  store
    .find_lead(id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::LeadNotFound(id))
}

/// One page of leads matching `filter`, with the total match count.
pub async fn list_leads<S: SalesStore>(
  store: &S,
  filter: &LeadFilter,
  page: Page,
) -> Result<(Vec<Lead>, u64)> {
  validate::lead_filter(filter)?;
  let total = store.count_leads(filter).await.map_err(Error::store)?;
  let leads = store.list_leads(filter, page).await.map_err(Error::store)?;
  Ok((leads, total))
}
