//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use strata_engine::EngineError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<EngineError> for ApiError {
  fn from(error: EngineError) -> Self {
    match error {
      EngineError::NoData(user_id) => {
        ApiError::NotFound(format!("no log points for user {user_id}"))
      }
      EngineError::InvalidConfig(message) => ApiError::BadRequest(message),
      EngineError::Store(source) => ApiError::Store(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn engine_errors_map_to_the_right_status_class() {
    let no_data: ApiError = EngineError::NoData(Uuid::nil()).into();
    assert!(matches!(no_data, ApiError::NotFound(_)));

    let bad_cfg: ApiError =
      EngineError::InvalidConfig("nope".to_owned()).into();
    assert!(matches!(bad_cfg, ApiError::BadRequest(_)));
  }
}
