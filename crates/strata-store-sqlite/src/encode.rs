//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! (`YYYY-MM-DD`). UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use strata_core::{
  insight::Insight,
  point::{Domain, LogPoint},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|_| {
    Error::DateParse(format!("invalid calendar date: {s:?}"))
  })
}

// ─── Domain ──────────────────────────────────────────────────────────────────

pub fn encode_domain(domain: Domain) -> &'static str {
  domain.as_str()
}

pub fn decode_domain(s: &str) -> Result<Domain> {
  Ok(Domain::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `log_points` row.
pub struct RawLogPoint {
  pub point_id: String,
  pub user_id:  String,
  pub date:     String,
  pub domain:   String,
  pub metric:   String,
  pub value:    Option<f64>,
  pub note:     Option<String>,
}

impl RawLogPoint {
  pub fn into_point(self) -> Result<LogPoint> {
    Ok(LogPoint {
      point_id: decode_uuid(&self.point_id)?,
      user_id:  decode_uuid(&self.user_id)?,
      date:     decode_date(&self.date)?,
      domain:   decode_domain(&self.domain)?,
      metric:   self.metric,
      value:    self.value,
      note:     self.note,
    })
  }
}

/// Raw strings read directly from an `insights` row.
pub struct RawInsight {
  pub insight_id:        String,
  pub user_id:           String,
  pub description:       String,
  pub correlation_score: f64,
  pub created_at:        String,
}

impl RawInsight {
  pub fn into_insight(self) -> Result<Insight> {
    Ok(Insight {
      insight_id:        decode_uuid(&self.insight_id)?,
      user_id:           decode_uuid(&self.user_id)?,
      description:       self.description,
      correlation_score: self.correlation_score,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}
