//! Log points — the fundamental unit of the Strata log.
//!
//! A log point is one immutable observation of a metric on a calendar date.
//! Points are never updated in place; an analysis run always re-reads the
//! raw rows and re-derives everything from them.

use std::{cmp::Ordering, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Domain ──────────────────────────────────────────────────────────────────

/// The life area a metric belongs to. Closed enumeration; anything that does
/// not fit goes under [`Domain::Other`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
  Sleep,
  Fitness,
  Climbing,
  Learning,
  Reflection,
  Other,
}

impl Domain {
  /// The discriminant string stored in the `domain` column.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Sleep => "sleep",
      Self::Fitness => "fitness",
      Self::Climbing => "climbing",
      Self::Learning => "learning",
      Self::Reflection => "reflection",
      Self::Other => "other",
    }
  }

  /// Inverse of [`Domain::as_str`].
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "sleep" => Ok(Self::Sleep),
      "fitness" => Ok(Self::Fitness),
      "climbing" => Ok(Self::Climbing),
      "learning" => Ok(Self::Learning),
      "reflection" => Ok(Self::Reflection),
      "other" => Ok(Self::Other),
      other => Err(Error::UnknownDomain(other.to_owned())),
    }
  }
}

impl fmt::Display for Domain {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── MetricKey ───────────────────────────────────────────────────────────────

/// The identifier of one measurable series: a domain plus a metric name.
///
/// Displays as `"{domain}_{metric}"` (e.g. `sleep_hours`). The total order
/// is lexical over `(domain string, metric name)` — the order used for pair
/// iteration and tie-breaks, so analysis output is reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricKey {
  pub domain: Domain,
  pub metric: String,
}

impl MetricKey {
  pub fn new(domain: Domain, metric: impl Into<String>) -> Self {
    Self { domain, metric: metric.into() }
  }
}

impl Ord for MetricKey {
  fn cmp(&self, other: &Self) -> Ordering {
    (self.domain.as_str(), self.metric.as_str())
      .cmp(&(other.domain.as_str(), other.metric.as_str()))
  }
}

impl PartialOrd for MetricKey {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for MetricKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}_{}", self.domain, self.metric)
  }
}

// ─── DateRange ───────────────────────────────────────────────────────────────

/// A closed calendar-date range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

impl DateRange {
  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }
}

// ─── LogPoint ────────────────────────────────────────────────────────────────

/// One raw observation. Numeric points carry a `value`; journal-style points
/// carry only a `note` and stay out of the numeric series entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPoint {
  pub point_id: Uuid,
  pub user_id:  Uuid,
  pub date:     NaiveDate,
  pub domain:   Domain,
  pub metric:   String,
  pub value:    Option<f64>,
  pub note:     Option<String>,
}

impl LogPoint {
  /// The series this point feeds.
  pub fn metric_key(&self) -> MetricKey {
    MetricKey { domain: self.domain, metric: self.metric.clone() }
  }
}

// ─── NewLogPoint ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::LogStore::record_point`].
/// The `point_id` is always assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLogPoint {
  pub user_id: Uuid,
  pub date:    NaiveDate,
  pub domain:  Domain,
  pub metric:  String,
  pub value:   Option<f64>,
  pub note:    Option<String>,
}

impl NewLogPoint {
  /// Convenience constructor with no value and no note; chain
  /// [`NewLogPoint::with_value`] / [`NewLogPoint::with_note`] as needed.
  pub fn new(
    user_id: Uuid,
    date: NaiveDate,
    domain: Domain,
    metric: impl Into<String>,
  ) -> Self {
    Self {
      user_id,
      date,
      domain,
      metric: metric.into(),
      value: None,
      note: None,
    }
  }

  pub fn with_value(mut self, value: f64) -> Self {
    self.value = Some(value);
    self
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.note = Some(note.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn metric_key_displays_as_domain_underscore_metric() {
    let key = MetricKey::new(Domain::Sleep, "hours");
    assert_eq!(key.to_string(), "sleep_hours");
  }

  #[test]
  fn metric_key_order_is_lexical_over_domain_string() {
    // Variant declaration order would put Sleep first; the lexical order
    // used for pair iteration puts climbing first.
    let sleep = MetricKey::new(Domain::Sleep, "hours");
    let climb = MetricKey::new(Domain::Climbing, "grade");
    assert!(climb < sleep);

    let a = MetricKey::new(Domain::Fitness, "pushups");
    let b = MetricKey::new(Domain::Fitness, "steps");
    assert!(a < b);
  }

  #[test]
  fn domain_round_trips_through_strings() {
    for domain in [
      Domain::Sleep,
      Domain::Fitness,
      Domain::Climbing,
      Domain::Learning,
      Domain::Reflection,
      Domain::Other,
    ] {
      assert_eq!(Domain::parse(domain.as_str()).unwrap(), domain);
    }
    assert!(Domain::parse("astrology").is_err());
  }
}
