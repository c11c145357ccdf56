//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | `?skip`, `?limit`, `?min_age`; total in `X-Total-Count` |
//! | `POST`   | `/users` | Body: [`NewUser`]; returns 201 + user |
//! | `GET`    | `/users/:id` | 404 if not found |
//! | `PUT`    | `/users/:id` | Body: [`UserPatch`]; at least one field |
//! | `DELETE` | `/users/:id` | `{"detail": ...}` |

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
  service::users,
  store::{DEFAULT_LIMIT, Page, SalesStore},
  user::{NewUser, User, UserFilter, UserPatch},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, TOTAL_COUNT_HEADER, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

fn default_limit() -> u64 { DEFAULT_LIMIT }

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:    u64,
  #[serde(default = "default_limit")]
  pub limit:   u64,
  pub min_age: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UserList {
  pub users: Vec<User>,
}

/// `GET /users[?skip=..][&limit=..][&min_age=..]`
pub async fn list<S: SalesStore>(
  State(state): State<ApiState<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Query(params) = params?;
  let filter = UserFilter { min_age: params.min_age };
  let page = Page { skip: params.skip, limit: params.limit };

  let (users, total) = users::list_users(state.store.as_ref(), &filter, page).await?;
  Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(UserList { users })))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /users`
pub async fn create<S: SalesStore>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let user = users::create_user(state.store.as_ref(), body).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<User>, ApiError> {
  let Path(id) = id?;
  Ok(Json(users::get_user(state.store.as_ref(), id).await?))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /users/:id`
pub async fn update<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
  let Path(id) = id?;
  let Json(patch) = body?;
  Ok(Json(users::update_user(state.store.as_ref(), id, patch).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /users/:id`
pub async fn delete<S: SalesStore>(
  State(state): State<ApiState<S>>,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Path(id) = id?;
  users::delete_user(state.store.as_ref(), id).await?;
  Ok(Json(json!({ "detail": "User deleted successfully" })))
}
