//! Handlers for `/leads` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/leads` | `?skip`, `?limit` and [`ListParams`] filters; total in `X-Total-Count` |
//! | `POST`   | `/leads` | Body: [`NewLead`]; returns 201 + the created or merged lead |
//! | `GET`    | `/leads/:id` | 404 if not found |
//! | `PUT`    | `/leads/:id` | Body: [`LeadPatch`]; rescored |
//! | `DELETE` | `/leads/:id` | `{"detail": ...}` |
//! | `POST`   | `/leads/:id/interactions` | Body: [`NewInteraction`]; returns the rescored lead |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use salestrack_core::{
  lead::{Lead, LeadFilter, LeadPatch, LeadSource, LeadStatus, NewInteraction, NewLead},
  service::leads,
  store::{DEFAULT_LIMIT, Page, SalesStore},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, TOTAL_COUNT_HEADER, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

fn default_limit() -> u64 { DEFAULT_LIMIT }

/// Query string of `GET /leads`. Name, company and job title filters are
/// case-insensitive regular expressions; the rest match exactly.
#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:       u64,
  #[serde(default = "default_limit")]
  pub limit:      u64,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub status:     Option<LeadStatus>,
  pub source:     Option<LeadSource>,
  pub company:    Option<String>,
  pub job_title:  Option<String>,
  pub phone:      Option<String>,
}

impl ListParams {
  fn split(self) -> (LeadFilter, Page) {
    let page = Page { skip: self.skip, limit: self.limit };
    let filter = LeadFilter {
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      status:     self.status,
      source:     self.source,
      company:    self.company,
      job_title:  self.job_title,
      phone:      self.phone,
    };
    (filter, page)
  }
}

#[derive(Debug, Serialize)]
pub struct LeadList {
  pub leads: Vec<Lead>,
}

/// `GET /leads[?skip=..][&limit=..][&<filter>=..]`
pub async fn list<S: SalesStore>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Query(params) = params?;
  let (filter, page) = params.split();

  let (leads, total) = leads::list_leads(state.store.as_ref(), &filter, page).await?;
  Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(LeadList { leads })))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /leads` — merges into an existing lead with the same email or phone.
pub async fn create<S: SalesStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewLead>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let now = state.clock.now();
  let lead = leads::create_or_merge(state.store.as_ref(), now, body).await?;
  Ok((StatusCode::CREATED, Json(lead)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /leads/:id`
pub async fn get_one<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Lead>, ApiError> {
  let Path(id) = id?;
  Ok(Json(leads::get_lead(state.store.as_ref(), id).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /leads/:id`
pub async fn update<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<LeadPatch>, JsonRejection>,
) -> Result<Json<Lead>, ApiError> {
  let Path(id) = id?;
  let Json(patch) = body?;
  let now = state.clock.now();
  Ok(Json(leads::update_fields(state.store.as_ref(), now, id, patch).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /leads/:id`
pub async fn delete<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Path(id) = id?;
  leads::delete_lead(state.store.as_ref(), id).await?;
  Ok(Json(json!({ "detail": "Lead deleted successfully" })))
}

// ─── Interactions ────────────────────────────────────────────────────────────

/// `POST /leads/:id/interactions`
pub async fn add_interaction<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<NewInteraction>, JsonRejection>,
) -> Result<Json<Lead>, ApiError> {
  let Path(id) = id?;
  let Json(input) = body?;
  let now = state.clock.now();
  Ok(Json(leads::append_interaction(state.store.as_ref(), now, id, input).await?))
}
