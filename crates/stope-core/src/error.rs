//! Error types for `stope-core`.

use thiserror::Error;

use crate::validate::FieldErrors;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more field-level validation failures. Never persisted.
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  #[error("department not found: {0}")]
  DepartmentNotFound(i64),

  #[error("site not found: {0}")]
  SiteNotFound(i64),

  #[error("shift not found: {0}")]
  ShiftNotFound(i64),

  /// A record looked up by its natural or surrogate key does not exist.
  #[error("{entity} not found: {key}")]
  RecordNotFound { entity: &'static str, key: String },

  /// Natural-key collision, e.g. a second production log for the same date.
  #[error("{entity} already exists for {key}")]
  DuplicateKey { entity: &'static str, key: String },

  /// The live write and its shadow write could not be applied together.
  /// The enclosing transaction has been rolled back.
  #[error("transaction failed: {0}")]
  Transaction(String),

  #[error("storage error: {0}")]
  Storage(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl From<FieldErrors> for Error {
  fn from(errors: FieldErrors) -> Self { Error::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
