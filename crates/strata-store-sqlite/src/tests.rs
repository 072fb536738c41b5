//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use strata_core::{
  insight::NewInsight,
  point::{DateRange, Domain, NewLogPoint},
  store::LogStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

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

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = user(&s, "alice").await;
  assert_eq!(user.name, "alice");

  let fetched = s.get_user(user.user_id).await.unwrap();
  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  let result = s.get_user(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn list_user_ids_covers_everyone() {
  let s = store().await;
  let a = user(&s, "alice").await;
  let b = user(&s, "bob").await;

  let ids = s.list_user_ids().await.unwrap();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains(&a.user_id));
  assert!(ids.contains(&b.user_id));

  let users = s.list_users().await.unwrap();
  assert_eq!(users.len(), 2);
}

// ─── Log points ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_point_and_fetch() {
  let s = store().await;
  let user = user(&s, "alice").await;

  let recorded = s
    .record_point(
      NewLogPoint::new(user.user_id, date(1), Domain::Sleep, "hours")
        .with_value(7.5),
    )
    .await
    .unwrap();
  assert_eq!(recorded.user_id, user.user_id);

  let points = s.fetch_points(user.user_id, None).await.unwrap();
  assert_eq!(points.len(), 1);
  assert_eq!(points[0].point_id, recorded.point_id);
  assert_eq!(points[0].domain, Domain::Sleep);
  assert_eq!(points[0].value, Some(7.5));
}

#[tokio::test]
async fn record_point_for_unknown_user_fails() {
  let s = store().await;
  let result = s
    .record_point(
      NewLogPoint::new(Uuid::new_v4(), date(1), Domain::Sleep, "hours")
        .with_value(7.0),
    )
    .await;
  assert!(matches!(result, Err(Error::UserNotFound(_))));
}

#[tokio::test]
async fn note_only_points_round_trip() {
  let s = store().await;
  let user = user(&s, "alice").await;

  s.record_point(
    NewLogPoint::new(user.user_id, date(1), Domain::Reflection, "journal_entry")
      .with_note("sent my first 7a"),
  )
  .await
  .unwrap();

  let points = s.fetch_points(user.user_id, None).await.unwrap();
  assert_eq!(points[0].value, None);
  assert_eq!(points[0].note.as_deref(), Some("sent my first 7a"));
}

#[tokio::test]
async fn fetch_points_is_date_sorted() {
  let s = store().await;
  let user = user(&s, "alice").await;

  for day in [3, 1, 2] {
    s.record_point(
      NewLogPoint::new(user.user_id, date(day), Domain::Sleep, "hours")
        .with_value(f64::from(day)),
    )
    .await
    .unwrap();
  }

  let points = s.fetch_points(user.user_id, None).await.unwrap();
  let dates: Vec<_> = points.iter().map(|p| p.date).collect();
  assert_eq!(dates, [date(1), date(2), date(3)]);
}

#[tokio::test]
async fn fetch_points_honours_the_range() {
  let s = store().await;
  let user = user(&s, "alice").await;

  for day in 1..=10 {
    s.record_point(
      NewLogPoint::new(user.user_id, date(day), Domain::Fitness, "steps")
        .with_value(1000.0 * f64::from(day)),
    )
    .await
    .unwrap();
  }

  let range = DateRange { start: date(3), end: date(5) };
  let points = s.fetch_points(user.user_id, Some(range)).await.unwrap();
  assert_eq!(points.len(), 3);
  assert!(points.iter().all(|p| range.contains(p.date)));
}

#[tokio::test]
async fn fetch_points_does_not_leak_across_users() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;

  s.record_point(
    NewLogPoint::new(alice.user_id, date(1), Domain::Sleep, "hours")
      .with_value(7.0),
  )
  .await
  .unwrap();

  let points = s.fetch_points(bob.user_id, None).await.unwrap();
  assert!(points.is_empty());
}

// ─── Insights ────────────────────────────────────────────────────────────────

fn insight(description: &str, score: f64) -> NewInsight {
  NewInsight { description: description.to_owned(), score }
}

#[tokio::test]
async fn replace_insights_stores_in_order() {
  let s = store().await;
  let user = user(&s, "alice").await;

  let stored = s
    .replace_insights(
      user.user_id,
      vec![insight("first", 0.9), insight("second", -0.8)],
    )
    .await
    .unwrap();
  assert_eq!(stored.len(), 2);

  let listed = s.list_insights(user.user_id).await.unwrap();
  let descriptions: Vec<_> =
    listed.iter().map(|i| i.description.as_str()).collect();
  assert_eq!(descriptions, ["first", "second"]);
  assert_eq!(listed[0].correlation_score, 0.9);
  assert_eq!(listed[1].correlation_score, -0.8);
}

#[tokio::test]
async fn replacement_leaves_no_stale_entries() {
  let s = store().await;
  let user = user(&s, "alice").await;

  s.replace_insights(
    user.user_id,
    vec![insight("old one", 0.5), insight("old two", 0.4)],
  )
  .await
  .unwrap();

  s.replace_insights(user.user_id, vec![insight("new", 0.7)])
    .await
    .unwrap();

  let listed = s.list_insights(user.user_id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].description, "new");
}

#[tokio::test]
async fn replacement_with_empty_set_clears() {
  let s = store().await;
  let user = user(&s, "alice").await;

  s.replace_insights(user.user_id, vec![insight("stale", 0.5)])
    .await
    .unwrap();
  s.replace_insights(user.user_id, Vec::new()).await.unwrap();

  assert!(s.list_insights(user.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn replacement_only_touches_the_given_user() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;

  s.replace_insights(alice.user_id, vec![insight("alice's", 0.6)])
    .await
    .unwrap();
  s.replace_insights(bob.user_id, vec![insight("bob's", 0.7)])
    .await
    .unwrap();

  let alices = s.list_insights(alice.user_id).await.unwrap();
  assert_eq!(alices.len(), 1);
  assert_eq!(alices[0].description, "alice's");
}

#[tokio::test]
async fn replace_insights_for_unknown_user_fails() {
  let s = store().await;
  let result = s
    .replace_insights(Uuid::new_v4(), vec![insight("orphan", 0.5)])
    .await;
  assert!(matches!(result, Err(Error::UserNotFound(_))));
}
