//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stope_core::validate::FieldErrors;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Field-level rule violations; serialised as `{"errors": {field: [..]}}`.
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(String),
}

impl ApiError {
  /// Map a storage-layer failure onto the API surface. Referential and
  /// key-existence failures become 404/409; everything else is a 500.
  pub fn from_store<E: Into<stope_core::Error>>(e: E) -> Self {
    match e.into() {
      stope_core::Error::Validation(errors) => ApiError::Validation(errors),
      e @ (stope_core::Error::DepartmentNotFound(_)
      | stope_core::Error::SiteNotFound(_)
      | stope_core::Error::ShiftNotFound(_)
      | stope_core::Error::RecordNotFound { .. }) => ApiError::NotFound(e.to_string()),
      e @ stope_core::Error::DuplicateKey { .. } => ApiError::Conflict(e.to_string()),
      e => ApiError::Store(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "errors": errors })),
      )
        .into_response(),
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict(m) => {
        (StatusCode::CONFLICT, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Store(m) => {
        tracing::error!(error = %m, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal error" })),
        )
          .into_response()
      }
    }
  }
}
