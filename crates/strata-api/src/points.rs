//! Handlers for `/points` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/points` | `?user_id` required; optional `from`/`to` (both or neither) |
//! | `POST` | `/points` | Body: [`NewLogPoint`]; returns 201 + stored point |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use strata_core::{
  point::{DateRange, LogPoint, NewLogPoint},
  store::LogStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the user whose points to return.
  pub user_id: Uuid,
  pub from:    Option<NaiveDate>,
  pub to:      Option<NaiveDate>,
}

/// `GET /points?user_id=<id>[&from=YYYY-MM-DD&to=YYYY-MM-DD]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<LogPoint>>, ApiError>
where
  S: LogStore,
{
  let range = match (params.from, params.to) {
    (Some(start), Some(end)) => {
      if start > end {
        return Err(ApiError::BadRequest(
          "`from` must not be after `to`".to_owned(),
        ));
      }
      Some(DateRange { start, end })
    }
    (None, None) => None,
    _ => {
      return Err(ApiError::BadRequest(
        "`from` and `to` must be given together".to_owned(),
      ));
    }
  };

  let points = state
    .store
    .fetch_points(params.user_id, range)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(points))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /points` — returns 201 + the stored [`LogPoint`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewLogPoint>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LogStore,
{
  if body.value.is_none() && body.note.is_none() {
    return Err(ApiError::BadRequest(
      "a point needs a value, a note, or both".to_owned(),
    ));
  }
  let point = state
    .store
    .record_point(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(point)))
}
