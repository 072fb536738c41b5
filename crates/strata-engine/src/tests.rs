//! Integration tests for the full pipeline against an in-memory store.

use chrono::NaiveDate;
use strata_core::{
  point::{Domain, NewLogPoint},
  store::LogStore,
  user::{NewUser, User},
};
use strata_store_sqlite::SqliteStore;

use crate::{AnalysisConfig, EngineError, run};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> User {
  s.add_user(NewUser {
    name:  name.to_owned(),
    email: format!("{name}@example.com"),
  })
  .await
  .unwrap()
}

fn date(day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

async fn seed_metric(
  s: &SqliteStore,
  user: &User,
  domain: Domain,
  metric: &str,
  values: &[f64],
) {
  for (offset, value) in values.iter().enumerate() {
    s.record_point(
      NewLogPoint::new(user.user_id, date(1 + offset as u32), domain, metric)
        .with_value(*value),
    )
    .await
    .unwrap();
  }
}

const SLEEP_HOURS: [f64; 7] = [7.0, 7.2, 6.8, 7.5, 6.9, 7.1, 7.3];
const CLIMBING_PERF: [f64; 7] = [6.9, 7.1, 6.7, 7.6, 6.8, 7.0, 7.4];
const SCREEN_TIME: [f64; 7] = [5.0, 2.0, 6.0, 1.0, 4.0, 3.0, 2.0];
const MOOD: [f64; 7] = [4.0, 8.0, 3.0, 9.0, 5.0, 6.0, 8.0];

// ─── Single-user runs ────────────────────────────────────────────────────────

#[tokio::test]
async fn sleep_and_climbing_produce_a_strong_positive_insight() {
  let s = store().await;
  let user = user(&s, "kath").await;
  seed_metric(&s, &user, Domain::Sleep, "hours", &SLEEP_HOURS).await;
  seed_metric(&s, &user, Domain::Climbing, "perf", &CLIMBING_PERF).await;

  let report = run::run_for_user(&s, user.user_id, &AnalysisConfig::default())
    .await
    .unwrap();

  assert_eq!(report.total_points, 14);
  assert_eq!(report.total_metrics, 2);
  assert_eq!(report.pairs_tested, 1);
  assert_eq!(report.significant_count, 1);
  assert_eq!(report.positive_count, 1);

  let insight = &report.insights[0];
  assert!(insight.correlation_score > 0.9);
  assert!(insight.description.contains("strong"));
  assert!(insight.description.contains("positive"));
  assert!(insight.description.contains("perf"));
  assert!(insight.description.contains("hours"));
  assert!(insight.description.contains("highly significant"));
}

#[tokio::test]
async fn negative_relationships_land_in_the_negative_partition() {
  let s = store().await;
  let user = user(&s, "kath").await;
  seed_metric(&s, &user, Domain::Learning, "screen_time", &SCREEN_TIME).await;
  seed_metric(&s, &user, Domain::Reflection, "mood", &MOOD).await;

  let report = run::run_for_user(&s, user.user_id, &AnalysisConfig::default())
    .await
    .unwrap();

  assert_eq!(report.positive_count, 0);
  assert_eq!(report.negative_count, 1);
  assert!(report.insights[0].correlation_score < -0.9);
  assert!(report.insights[0].description.contains("worse"));
}

#[tokio::test]
async fn run_is_deterministic_on_unchanged_data() {
  let s = store().await;
  let user = user(&s, "kath").await;
  seed_metric(&s, &user, Domain::Sleep, "hours", &SLEEP_HOURS).await;
  seed_metric(&s, &user, Domain::Climbing, "perf", &CLIMBING_PERF).await;
  seed_metric(&s, &user, Domain::Learning, "screen_time", &SCREEN_TIME).await;
  seed_metric(&s, &user, Domain::Reflection, "mood", &MOOD).await;

  let cfg = AnalysisConfig::default();
  let first = run::run_for_user(&s, user.user_id, &cfg).await.unwrap();
  let second = run::run_for_user(&s, user.user_id, &cfg).await.unwrap();

  let describe = |report: &run::RunReport| {
    report
      .insights
      .iter()
      .map(|i| (i.description.clone(), i.correlation_score))
      .collect::<Vec<_>>()
  };
  assert_eq!(describe(&first), describe(&second));
  assert_eq!(first.significant_count, second.significant_count);

  // The store holds exactly the latest set — no duplicates, no stale rows.
  let listed = s.list_insights(user.user_id).await.unwrap();
  assert_eq!(listed.len(), second.insights.len());
}

#[tokio::test]
async fn rerun_replaces_the_previous_insight_set() {
  let s = store().await;
  let user = user(&s, "kath").await;
  seed_metric(&s, &user, Domain::Sleep, "hours", &SLEEP_HOURS).await;
  seed_metric(&s, &user, Domain::Climbing, "perf", &CLIMBING_PERF).await;

  let cfg = AnalysisConfig::default();
  run::run_for_user(&s, user.user_id, &cfg).await.unwrap();

  // Tighten the strength gate past the pair's |r|: the rerun must leave an
  // empty set, not the old insight.
  let strict = AnalysisConfig { min_abs_r: 0.999, ..cfg };
  let report = run::run_for_user(&s, user.user_id, &strict).await.unwrap();

  assert_eq!(report.significant_count, 0);
  assert!(s.list_insights(user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_variance_metrics_never_surface() {
  let s = store().await;
  let user = user(&s, "kath").await;
  seed_metric(&s, &user, Domain::Sleep, "hours", &SLEEP_HOURS).await;
  seed_metric(&s, &user, Domain::Other, "meditation", &[1.0; 7]).await;

  let report = run::run_for_user(&s, user.user_id, &AnalysisConfig::default())
    .await
    .unwrap();

  assert_eq!(report.significant_count, 0);
  for insight in &report.insights {
    assert!(insight.correlation_score.is_finite());
  }
}

#[tokio::test]
async fn sparse_overlap_yields_no_insights() {
  let s = store().await;
  let user = user(&s, "kath").await;
  // Both metrics observed on only two days.
  seed_metric(&s, &user, Domain::Sleep, "hours", &[7.0, 7.5]).await;
  seed_metric(&s, &user, Domain::Climbing, "perf", &[6.9, 7.6]).await;

  let report = run::run_for_user(&s, user.user_id, &AnalysisConfig::default())
    .await
    .unwrap();

  assert_eq!(report.pairs_tested, 0);
  assert!(report.insights.is_empty());
}

#[tokio::test]
async fn no_data_is_reported_as_such() {
  let s = store().await;
  let user = user(&s, "kath").await;

  let result =
    run::run_for_user(&s, user.user_id, &AnalysisConfig::default()).await;
  assert!(matches!(result, Err(EngineError::NoData(id)) if id == user.user_id));
}

#[tokio::test]
async fn malformed_config_propagates() {
  let s = store().await;
  let user = user(&s, "kath").await;

  let cfg = AnalysisConfig { significance_p: 1.5, ..AnalysisConfig::default() };
  let result = run::run_for_user(&s, user.user_id, &cfg).await;
  assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}

#[tokio::test]
async fn top_n_caps_each_polarity() {
  let s = store().await;
  let user = user(&s, "kath").await;

  // Five sleep metrics tracking each other closely: 10 significant
  // positive pairs, of which only top_n may survive.
  let base = SLEEP_HOURS;
  for (index, name) in ["a", "b", "c", "d", "e"].iter().enumerate() {
    let offset: Vec<f64> =
      base.iter().map(|v| v + index as f64 * 0.01).collect();
    seed_metric(&s, &user, Domain::Sleep, name, &offset).await;
  }

  let cfg = AnalysisConfig { top_n_per_polarity: 2, ..Default::default() };
  let report = run::run_for_user(&s, user.user_id, &cfg).await.unwrap();

  assert_eq!(report.pairs_tested, 10);
  assert!(report.positive_count <= 2);
  assert_eq!(report.negative_count, 0);
}

// ─── Batch runs ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_isolates_users_without_data() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await; // no points at all
  let carol = user(&s, "carol").await;

  for u in [&alice, &carol] {
    seed_metric(&s, u, Domain::Sleep, "hours", &SLEEP_HOURS).await;
    seed_metric(&s, u, Domain::Climbing, "perf", &CLIMBING_PERF).await;
  }

  let report = run::run_for_all_users(&s, &AnalysisConfig::default())
    .await
    .unwrap();

  assert_eq!(report.users_processed, 2);
  assert_eq!(report.users_skipped, 1);
  assert_eq!(report.users_failed, 0);
  assert_eq!(report.insights_written, 2);

  assert_eq!(s.list_insights(alice.user_id).await.unwrap().len(), 1);
  assert!(s.list_insights(bob.user_id).await.unwrap().is_empty());
  assert_eq!(s.list_insights(carol.user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn batch_rejects_malformed_config_up_front() {
  let s = store().await;
  let cfg = AnalysisConfig { min_overlap: 0, ..AnalysisConfig::default() };
  let result = run::run_for_all_users(&s, &cfg).await;
  assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}
