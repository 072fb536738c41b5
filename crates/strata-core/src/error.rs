//! Error types for `strata-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown domain: {0:?}")]
  UnknownDomain(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
