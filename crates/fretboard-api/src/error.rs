//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("{0}")]
  Resolve(#[from] fretboard_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use fretboard_core::Error as Core;

    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Resolve(Core::EmptyIdentifier) => StatusCode::BAD_REQUEST,
      ApiError::Resolve(Core::Cancelled) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Resolve(Core::DuplicateCandidate(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
