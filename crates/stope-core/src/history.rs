//! Shadow-row (historical audit) types.
//!
//! Every create/update/delete of a tracked entity appends one immutable
//! snapshot row in the same transaction as the live write. Snapshots are
//! never mutated and outlive the live row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of mutation a shadow row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
  Created,
  Changed,
  Deleted,
}

impl ChangeKind {
  /// The discriminant string stored in the `history_change` column.
  pub fn as_str(self) -> &'static str {
    match self {
      ChangeKind::Created => "created",
      ChangeKind::Changed => "changed",
      ChangeKind::Deleted => "deleted",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "created" => Some(ChangeKind::Created),
      "changed" => Some(ChangeKind::Changed),
      "deleted" => Some(ChangeKind::Deleted),
      _ => None,
    }
  }
}

/// Caller-supplied metadata attached to a shadow row.
/// Both fields are optional; the store never invents either.
#[derive(Debug, Clone, Default)]
pub struct ChangeContext {
  /// Human-supplied reason for the change.
  pub reason: Option<String>,
  /// Acting-user reference; nullable by design.
  pub user:   Option<String>,
}

/// One shadow row: the full field snapshot of `record` at the moment of the
/// mutation, plus the change metadata.
///
/// Retrieval order is `(recorded_at DESC, history_id DESC)` — latest change
/// first, ties broken by row identity.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry<T> {
  pub history_id:  i64,
  pub recorded_at: DateTime<Utc>,
  pub change:      ChangeKind,
  pub reason:      Option<String>,
  pub user:        Option<String>,
  pub record:      T,
}
