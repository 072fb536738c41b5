//! Error types for `strata-engine`.
//!
//! Per-pair anomalies (insufficient overlap, degenerate variance) never
//! appear here — they are handled inside the correlator by skipping the
//! pair and counting it in the diagnostics. This enum covers only the
//! conditions that escape a single user's pipeline.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EngineError {
  /// The user has zero log points in the requested window. Batch callers
  /// treat this as "nothing to do"; interactive callers surface it as a
  /// client error.
  #[error("no log points for user {0}")]
  NoData(Uuid),

  /// Malformed thresholds. The only engine error that should propagate all
  /// the way to the top-level caller.
  #[error("invalid analysis config: {0}")]
  InvalidConfig(String),

  /// The storage collaborator failed. Fatal for the affected user's run;
  /// the batch orchestrator logs it and moves on to the next user.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
