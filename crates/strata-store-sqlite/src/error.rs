//! Error type for `strata-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] strata_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to record a point or replace insights for an unknown user.
  #[error("user not found: {0}")]
  UserNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
