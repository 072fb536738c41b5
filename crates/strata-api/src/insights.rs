//! Handler for `/insights`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use strata_core::{insight::Insight, store::LogStore};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_id: Uuid,
}

/// `GET /insights?user_id=<id>`
///
/// Returns the user's current insight set in the order the last analysis
/// produced it: positives first, each polarity strongest-first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Insight>>, ApiError>
where
  S: LogStore,
{
  let insights = state
    .store
    .list_insights(params.user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(insights))
}
