//! Orchestration — drive the pipeline per user, isolate failures in batch.

use chrono::{Duration, Utc};
use serde::Serialize;
use strata_core::{
  insight::{Insight, NewInsight},
  point::DateRange,
  store::LogStore,
};
use uuid::Uuid;

use crate::{
  config::{AnalysisConfig, Lookback},
  correlate,
  error::{EngineError, Result},
  narrate, select,
  series::MetricSeries,
};

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Outcome of a single-user run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub user_id:           Uuid,
  pub total_points:      usize,
  pub total_metrics:     usize,
  /// Pairs with enough overlap to reach the Pearson computation.
  pub pairs_tested:      usize,
  /// Pairs that passed both the significance and strength gates and made
  /// the per-polarity cut.
  pub significant_count: usize,
  pub positive_count:    usize,
  pub negative_count:    usize,
  /// The stored insights, positives first, each polarity strongest-first.
  pub insights:          Vec<Insight>,
}

/// Outcome of an all-users batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
  pub users_processed:  usize,
  /// Users with no log points in the window.
  pub users_skipped:    usize,
  /// Users whose run failed. The batch continues past them.
  pub users_failed:     usize,
  pub insights_written: usize,
}

// ─── Single user ─────────────────────────────────────────────────────────────

/// Run the full pipeline for one user and replace their insight set.
///
/// Deterministic: all intermediate steps are pure functions over the
/// fetched points, so re-running on unchanged data reproduces the same
/// descriptions, scores, and ordering.
pub async fn run_for_user<S>(
  store: &S,
  user_id: Uuid,
  cfg: &AnalysisConfig,
) -> Result<RunReport>
where
  S: LogStore,
{
  cfg.validate()?;

  let range = lookback_range(cfg.lookback);
  let points = store
    .fetch_points(user_id, range)
    .await
    .map_err(box_store)?;
  if points.is_empty() {
    return Err(EngineError::NoData(user_id));
  }

  let series = MetricSeries::from_points(&points);
  let outcome = correlate::pairwise(&series, cfg.min_overlap);
  let selection = select::select(&outcome.records, cfg);

  let new_insights: Vec<NewInsight> = selection
    .iter()
    .map(|record| NewInsight {
      description: narrate::describe(record, cfg),
      score:       record.coefficient,
    })
    .collect();

  let insights = store
    .replace_insights(user_id, new_insights)
    .await
    .map_err(box_store)?;

  tracing::info!(
    %user_id,
    points = points.len(),
    metrics = series.metric_count(),
    pairs_tested = outcome.pairs_tested,
    skipped_overlap = outcome.skipped_overlap,
    skipped_degenerate = outcome.skipped_degenerate,
    positive = selection.positive.len(),
    negative = selection.negative.len(),
    "analysis run complete"
  );

  Ok(RunReport {
    user_id,
    total_points: points.len(),
    total_metrics: series.metric_count(),
    pairs_tested: outcome.pairs_tested,
    significant_count: selection.len(),
    positive_count: selection.positive.len(),
    negative_count: selection.negative.len(),
    insights,
  })
}

// ─── All users ───────────────────────────────────────────────────────────────

/// Run every known user through the pipeline, one at a time.
///
/// Each user runs inside a failure boundary: an error for one user is
/// logged and the loop continues — the batch never aborts because one
/// user's data is malformed. A user's insight replacement commits in full
/// or not at all; the batch can only stop between users.
pub async fn run_for_all_users<S>(
  store: &S,
  cfg: &AnalysisConfig,
) -> Result<BatchReport>
where
  S: LogStore,
{
  cfg.validate()?;

  let user_ids = store.list_user_ids().await.map_err(box_store)?;
  tracing::info!(users = user_ids.len(), "starting batch analysis");

  let mut report = BatchReport::default();
  for user_id in user_ids {
    match run_for_user(store, user_id, cfg).await {
      Ok(run) => {
        report.users_processed += 1;
        report.insights_written += run.insights.len();
      }
      Err(EngineError::NoData(_)) => {
        tracing::info!(%user_id, "no log points in window, skipping");
        report.users_skipped += 1;
      }
      Err(error) => {
        tracing::error!(%user_id, %error, "user analysis failed, continuing");
        report.users_failed += 1;
      }
    }
  }

  tracing::info!(
    processed = report.users_processed,
    skipped = report.users_skipped,
    failed = report.users_failed,
    insights = report.insights_written,
    "batch analysis complete"
  );
  Ok(report)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn lookback_range(lookback: Lookback) -> Option<DateRange> {
  match lookback {
    Lookback::All => None,
    Lookback::Days(days) => {
      let end = Utc::now().date_naive();
      let start = end - Duration::days(i64::from(days) - 1);
      Some(DateRange { start, end })
    }
  }
}

fn box_store<E>(error: E) -> EngineError
where
  E: std::error::Error + Send + Sync + 'static,
{
  EngineError::Store(Box::new(error))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookback_all_fetches_unbounded() {
    assert_eq!(lookback_range(Lookback::All), None);
  }

  #[test]
  fn lookback_window_includes_today() {
    let range = lookback_range(Lookback::Days(7)).unwrap();
    let today = Utc::now().date_naive();
    assert_eq!(range.end, today);
    assert_eq!(range.start, today - Duration::days(6));
    assert!(range.contains(today));
    assert!(range.contains(range.start));
  }
}
