//! Error type for `stope-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown schema version: {0}")]
  UnknownVersion(i32),

  #[error("department not found: {0}")]
  DepartmentNotFound(i64),

  #[error("site not found: {0}")]
  SiteNotFound(i64),

  #[error("shift not found: {0}")]
  ShiftNotFound(i64),

  #[error("{entity} not found: {key}")]
  RecordNotFound { entity: &'static str, key: String },

  #[error("{entity} already exists for {key}")]
  DuplicateKey { entity: &'static str, key: String },

  /// A live-row write and its shadow write could not be committed together;
  /// the whole transaction was rolled back.
  #[error("transaction failed: {0}")]
  Transaction(String),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    Error::Database(tokio_rusqlite::Error::Rusqlite(e))
  }
}

/// Lets API handlers map storage failures onto the domain error kinds.
impl From<Error> for stope_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DepartmentNotFound(id) => stope_core::Error::DepartmentNotFound(id),
      Error::SiteNotFound(id) => stope_core::Error::SiteNotFound(id),
      Error::ShiftNotFound(id) => stope_core::Error::ShiftNotFound(id),
      Error::RecordNotFound { entity, key } => {
        stope_core::Error::RecordNotFound { entity, key }
      }
      Error::DuplicateKey { entity, key } => {
        stope_core::Error::DuplicateKey { entity, key }
      }
      Error::Transaction(m) => stope_core::Error::Transaction(m),
      other => stope_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
