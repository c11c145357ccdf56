//! Router tests driving the API end to end against an in-memory store.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode, header},
  response::Response,
};
use chrono::{TimeZone, Utc};
use salestrack_core::clock::FixedClock;
use salestrack_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{TOTAL_COUNT_HEADER, api_router};

async fn app() -> Router {
  let store = SqliteStore::connect_in_memory().await.unwrap();
  let clock = FixedClock(Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap());
  api_router(Arc::new(store), Arc::new(clock))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn lead_body(email: &str, phone: Option<&str>) -> Value {
  json!({
    "first_name": "Grace",
    "last_name": "Hopper",
    "company": "Navy Labs",
    "company_size": 600,
    "email": email,
    "phone": phone,
    "job_title": "CTO",
    "source": "referral",
    "status": "negotiation"
  })
}

async fn create_lead(app: &Router, email: &str) -> Value {
  json_body(send(app, "POST", "/leads", Some(lead_body(email, None))).await).await
}

// ── Users ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_returns_201_then_409_on_same_email() {
  let app = app().await;
  let body = json!({ "name": "Alice", "email": "alice@example.com", "age": 30 });

  let resp = send(&app, "POST", "/users", Some(body.clone())).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let user = json_body(resp).await;
  assert_eq!(user["name"], "Alice");
  assert!(user["id"].is_string());

  let resp = send(&app, "POST", "/users", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn invalid_user_is_400() {
  let app = app().await;
  let resp = send(
    &app,
    "POST",
    "/users",
    Some(json!({ "name": "A", "email": "alice@example.com", "age": 30 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "POST", "/users", Some(json!({ "name": "Alice" }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_users_sets_total_count_header() {
  let app = app().await;
  for (i, age) in [25, 35, 45].into_iter().enumerate() {
    let body = json!({ "name": "User", "email": format!("u{i}@example.com"), "age": age });
    send(&app, "POST", "/users", Some(body)).await;
  }

  let resp = send(&app, "GET", "/users?min_age=30&limit=1", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(resp.headers()[TOTAL_COUNT_HEADER], "2");
  let body = json_body(resp).await;
  assert_eq!(body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn user_update_and_delete_round_trip() {
  let app = app().await;
  let body = json!({ "name": "Alice", "email": "alice@example.com", "age": 30 });
  let user = json_body(send(&app, "POST", "/users", Some(body)).await).await;
  let uri = format!("/users/{}", user["id"].as_str().unwrap());

  let resp = send(&app, "PUT", &uri, Some(json!({}))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "PUT", &uri, Some(json!({ "age": 31 }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["age"], 31);

  let resp = send(&app, "DELETE", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await, json!({ "detail": "User deleted successfully" }));

  let resp = send(&app, "GET", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_id_is_400() {
  let app = app().await;
  let resp = send(&app, "GET", "/users/not-a-uuid", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let resp = send(&app, "DELETE", "/leads/not-a-uuid", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Leads ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_lead_is_scored_and_merged_on_resubmit() {
  let app = app().await;

  let body = lead_body("grace@example.com", Some("555"));
  let resp = send(&app, "POST", "/leads", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let lead = json_body(resp).await;
  assert_eq!(lead["score"], 70.0);
  assert_eq!(lead["category"], "Hot");
  assert_eq!(lead["status"], "negotiation");
  assert_eq!(lead["interactions"], json!([]));

  let mut again = lead_body("grace@example.com", Some("555"));
  again["company"] = json!("Navy Research");
  let resp = send(&app, "POST", "/leads", Some(again)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let merged = json_body(resp).await;
  assert_eq!(merged["id"], lead["id"]);
  assert_eq!(merged["company"], "Navy Research");

  let resp = send(&app, "GET", "/leads", None).await;
  assert_eq!(resp.headers()[TOTAL_COUNT_HEADER], "1");
}

#[tokio::test]
async fn identity_conflict_is_409() {
  let app = app().await;
  send(&app, "POST", "/leads", Some(lead_body("a@example.com", Some("111")))).await;
  send(&app, "POST", "/leads", Some(lead_body("b@example.com", Some("222")))).await;

  let body = lead_body("a@example.com", Some("222"));
  let resp = send(&app, "POST", "/leads", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn other_source_alias_is_accepted() {
  let app = app().await;
  let mut body = lead_body("grace@example.com", None);
  body["source"] = json!("Other");
  let resp = send(&app, "POST", "/leads", Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["source"], "other");
}

#[tokio::test]
async fn add_interaction_rescores_the_lead() {
  let app = app().await;
  let lead = create_lead(&app, "grace@example.com").await;
  let uri = format!("/leads/{}/interactions", lead["id"].as_str().unwrap());

  let resp = send(
    &app,
    "POST",
    &uri,
    Some(json!({ "date": "2024-11-29T14:00:00+02:00", "type": "follow-up", "notes": "call back" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let updated = json_body(resp).await;
  assert_eq!(updated["score"], 85.0);
  assert_eq!(updated["category"], "Premium");
  assert_eq!(updated["interactions"][0]["date"], "2024-11-29T12:00:00Z");
  assert_eq!(updated["interactions"][0]["type"], "follow-up");
}

#[tokio::test]
async fn bad_interactions_are_400() {
  let app = app().await;
  let lead = create_lead(&app, "grace@example.com").await;
  let uri = format!("/leads/{}/interactions", lead["id"].as_str().unwrap());

  let resp = send(&app, "POST", &uri, Some(json!({}))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let naive = json!({ "type": "call", "date": "2024-11-29T14:00:00" });
  let resp = send(&app, "POST", &uri, Some(naive)).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "POST", &uri, Some(json!({ "type": "fax" }))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_lead_rescores_and_empty_update_is_400() {
  let app = app().await;
  let lead = create_lead(&app, "grace@example.com").await;
  let uri = format!("/leads/{}", lead["id"].as_str().unwrap());

  let resp = send(&app, "PUT", &uri, Some(json!({}))).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "PUT", &uri, Some(json!({ "status": "closed_lost" }))).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let updated = json_body(resp).await;
  assert_eq!(updated["score"], 45.0);
  assert_eq!(updated["category"], "Warm");
}

#[tokio::test]
async fn lead_filters_and_bad_filters() {
  let app = app().await;
  create_lead(&app, "grace@example.com").await;

  let resp = send(&app, "GET", "/leads?company=navy&status=negotiation", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["leads"].as_array().unwrap().len(), 1);

  let resp = send(&app, "GET", "/leads?source=linkedin", None).await;
  assert_eq!(resp.headers()[TOTAL_COUNT_HEADER], "0");

  let resp = send(&app, "GET", "/leads?status=sleeping", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = send(&app, "GET", "/leads?company=%28", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_missing_lead_is_404() {
  let app = app().await;
  let lead = create_lead(&app, "grace@example.com").await;
  let uri = format!("/leads/{}", lead["id"].as_str().unwrap());

  let resp = send(&app, "DELETE", &uri, None).await;
  assert_eq!(json_body(resp).await, json!({ "detail": "Lead deleted successfully" }));

  let resp = send(&app, "DELETE", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
