//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | All users |
//! | `POST` | `/users` | Body: `{"name":"…","email":"…"}`; returns 201 |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/users/:id/journal-summary` | Optional `?days=n` (default 7) |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use strata_core::{
  point::{DateRange, Domain},
  store::LogStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: LogStore,
{
  let users = state
    .store
    .list_users()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(users))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users` — body: `{"name":"…","email":"…"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LogStore,
{
  if body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("email must not be empty".to_owned()));
  }
  let user = state
    .store
    .add_user(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: LogStore,
{
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

// ─── Journal summary ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
  /// Trailing window in days; defaults to the last week.
  pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct JournalSummary {
  pub user_id: Uuid,
  pub days:    u32,
  pub summary: String,
}

/// `GET /users/:id/journal-summary[?days=n]`
///
/// Collects the user's reflection-domain notes in the window and hands them
/// to the summarizer collaborator. The collaborator degrades to a truncated
/// fallback on its own; this handler never fails because of it.
pub async fn journal_summary<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<SummaryParams>,
) -> Result<Json<JournalSummary>, ApiError>
where
  S: LogStore,
{
  let days = params.days.unwrap_or(7).max(1);
  let end = Utc::now().date_naive();
  let start = end - Duration::days(i64::from(days) - 1);
  let range = DateRange { start, end };

  let points = state
    .store
    .fetch_points(id, Some(range))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let notes: Vec<&str> = points
    .iter()
    .filter(|p| p.domain == Domain::Reflection)
    .filter_map(|p| p.note.as_deref())
    .collect();

  let summary = if notes.is_empty() {
    "No journal entries in this window.".to_owned()
  } else {
    state.summarizer.summarize(&notes.join("\n\n")).await
  };

  Ok(Json(JournalSummary { user_id: id, days, summary }))
}
