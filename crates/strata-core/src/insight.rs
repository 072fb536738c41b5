//! Insights — persisted, human-readable correlation statements.
//!
//! Insights are derived data. Each analysis run replaces a user's entire
//! insight set wholesale; nothing here is ever merged incrementally, so the
//! latest batch is always authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted correlation statement plus its signed score.
///
/// `correlation_score` is always the signed Pearson coefficient of the
/// underlying relationship, never its p-value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
  pub insight_id:        Uuid,
  pub user_id:           Uuid,
  pub description:       String,
  pub correlation_score: f64,
  /// Store-assigned timestamp; shared by all insights of one run.
  pub created_at:        DateTime<Utc>,
}

/// Input to [`crate::store::LogStore::replace_insights`].
/// Id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInsight {
  pub description: String,
  pub score:       f64,
}
