//! Handler for `/analysis/:user_id` — the synchronous on-demand trigger.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use strata_core::store::LogStore;
use strata_engine::{AnalysisConfig, Lookback, RunReport, run::run_for_user};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Optional per-field overrides of the default analysis configuration.
///
/// Every field is optional; an empty body (or none at all) runs the bulk
/// profile. `weekly: true` starts from the weekly profile instead, with the
/// explicit fields still applied on top.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisRequest {
  pub weekly:             bool,
  /// Trailing window in days; omit for the profile's own window.
  pub lookback_days:      Option<u32>,
  pub min_overlap:        Option<usize>,
  pub significance_p:     Option<f64>,
  pub min_abs_r:          Option<f64>,
  pub top_n_per_polarity: Option<usize>,
}

impl AnalysisRequest {
  fn into_config(self) -> AnalysisConfig {
    let mut cfg = if self.weekly {
      AnalysisConfig::weekly()
    } else {
      AnalysisConfig::default()
    };
    if let Some(days) = self.lookback_days {
      cfg.lookback = Lookback::Days(days);
    }
    if let Some(min_overlap) = self.min_overlap {
      cfg.min_overlap = min_overlap;
    }
    if let Some(significance_p) = self.significance_p {
      cfg.significance_p = significance_p;
    }
    if let Some(min_abs_r) = self.min_abs_r {
      cfg.min_abs_r = min_abs_r;
    }
    if let Some(top_n) = self.top_n_per_polarity {
      cfg.top_n_per_polarity = top_n;
    }
    cfg
  }
}

/// `POST /analysis/:user_id` — runs the full pipeline for one user and
/// returns the [`RunReport`]. The user's stored insight set is replaced as
/// a side effect.
///
/// A user with no points in the window yields 404; malformed thresholds
/// yield 400; a store failure yields 500 with nothing partially committed.
pub async fn run<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<Uuid>,
  body: Option<Json<AnalysisRequest>>,
) -> Result<Json<RunReport>, ApiError>
where
  S: LogStore,
{
  let cfg = body.map(|Json(b)| b).unwrap_or_default().into_config();
  let report = run_for_user(state.store.as_ref(), user_id, &cfg).await?;
  Ok(Json(report))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_request_is_the_bulk_profile() {
    let cfg = AnalysisRequest::default().into_config();
    assert_eq!(cfg.lookback, Lookback::All);
    assert_eq!(cfg.min_overlap, 5);
  }

  #[test]
  fn weekly_flag_switches_profiles() {
    let request = AnalysisRequest { weekly: true, ..Default::default() };
    let cfg = request.into_config();
    assert_eq!(cfg.lookback, Lookback::Days(7));
    assert_eq!(cfg.min_overlap, 3);
  }

  #[test]
  fn explicit_fields_win_over_the_profile() {
    let request = AnalysisRequest {
      weekly: true,
      lookback_days: Some(30),
      min_abs_r: Some(0.5),
      ..Default::default()
    };
    let cfg = request.into_config();
    assert_eq!(cfg.lookback, Lookback::Days(30));
    assert_eq!(cfg.min_abs_r, 0.5);
    assert_eq!(cfg.min_overlap, 3);
  }
}
