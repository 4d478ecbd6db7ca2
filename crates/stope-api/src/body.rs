//! Request-body and header plumbing shared by all write handlers.

use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use stope_core::{history::ChangeContext, validate::reject_read_only};

use crate::error::ApiError;

/// Caller-supplied change reason, attached to the shadow row.
pub const CHANGE_REASON_HEADER: &str = "x-change-reason";
/// Caller-supplied acting user, attached to the shadow row.
pub const CHANGE_USER_HEADER: &str = "x-change-user";

/// Build a [`ChangeContext`] from the change headers. Both are optional and
/// never invented server-side.
pub fn change_context(headers: &HeaderMap) -> ChangeContext {
  let text = |name: &str| {
    headers
      .get(name)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned)
  };
  ChangeContext {
    reason: text(CHANGE_REASON_HEADER),
    user:   text(CHANGE_USER_HEADER),
  }
}

/// Deserialise a write payload, first rejecting any read-only
/// (server-computed) field present in the raw JSON.
pub fn parse_payload<T: DeserializeOwned>(
  body: serde_json::Value,
  read_only: &[&str],
) -> Result<T, ApiError> {
  reject_read_only(&body, read_only).map_err(ApiError::Validation)?;
  serde_json::from_value(body)
    .map_err(|e| ApiError::BadRequest(format!("invalid payload: {e}")))
}
