//! The `LogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `strata-store-sqlite`).
//! Higher layers (`strata-engine`, `strata-api`) depend on this abstraction,
//! not on any concrete backend, and operate purely on value types — there
//! are no live object graphs, only `user_id` foreign keys.

use std::future::Future;

use uuid::Uuid;

use crate::{
  insight::{Insight, NewInsight},
  point::{DateRange, LogPoint, NewLogPoint},
  user::{NewUser, User},
};

/// Abstraction over a Strata storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait LogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new user. The id and timestamp are store-assigned.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// List all users.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// List every known user id. Used by the all-users batch mode; the order
  /// is stable so batch runs visit users deterministically.
  fn list_user_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Log points ────────────────────────────────────────────────────────

  /// Record one observation. A point with neither value nor note is still
  /// accepted here; input validation is the caller's concern.
  fn record_point(
    &self,
    input: NewLogPoint,
  ) -> impl Future<Output = Result<LogPoint, Self::Error>> + Send + '_;

  /// Return a user's points, date-ascending, optionally restricted to a
  /// closed date range. An empty result is not an error — callers decide
  /// whether "no data" is exceptional.
  fn fetch_points(
    &self,
    user_id: Uuid,
    range: Option<DateRange>,
  ) -> impl Future<Output = Result<Vec<LogPoint>, Self::Error>> + Send + '_;

  // ── Insights ──────────────────────────────────────────────────────────

  /// Return a user's current insight set in insertion order — after a
  /// replacement, that is exactly the order the analysis produced.
  fn list_insights(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Insight>, Self::Error>> + Send + '_;

  /// Atomically replace the user's entire insight set with `insights`,
  /// in order. Delete-then-insert inside one transaction: a reader never
  /// observes a mix of old and new, and a crash mid-run leaves either the
  /// old set intact or the new set complete.
  fn replace_insights(
    &self,
    user_id: Uuid,
    insights: Vec<NewInsight>,
  ) -> impl Future<Output = Result<Vec<Insight>, Self::Error>> + Send + '_;
}
