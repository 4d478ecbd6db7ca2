//! The validation layer — stateless checks applied before persistence.
//!
//! Every `New*` input type exposes `validate()`, which runs all of its rules
//! and reports every violation together rather than failing on the first.
//! Read-only (server-computed) fields are rejected separately via
//! [`reject_read_only`], checked against the raw JSON body before any range
//! rule runs.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ─── FieldErrors ─────────────────────────────────────────────────────────────

/// An accumulated map of field name → violation messages.
///
/// Ordered by field name so error output is deterministic.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  /// Append a violation message for `field`.
  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// `true` if `field` has at least one violation recorded.
  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
    self.0.iter()
  }

  /// `Ok(())` when no violations were recorded, `Err(self)` otherwise.
  pub fn into_result(self) -> Result<(), FieldErrors> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          write!(f, "; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}

// ─── Rule helpers ────────────────────────────────────────────────────────────

/// Record a violation unless `value` lies in `[0, 100]`.
pub fn check_percent(errors: &mut FieldErrors, field: &str, value: f64) {
  if !(0.0..=100.0).contains(&value) {
    errors.push(field, format!("{} must be between 0 and 100.", humanize(field)));
  }
}

/// Record a violation unless `value >= 0`.
pub fn check_non_negative(errors: &mut FieldErrors, field: &str, value: f64) {
  if value < 0.0 {
    errors.push(field, format!("{} cannot be negative.", humanize(field)));
  }
}

/// Record a violation unless `value >= 0`.
pub fn check_non_negative_count(errors: &mut FieldErrors, field: &str, value: i64) {
  if value < 0 {
    errors.push(field, format!("{} cannot be negative.", humanize(field)));
  }
}

/// Snake-case field name → sentence-case prose for error messages,
/// e.g. `total_weight` → "Total weight".
fn humanize(field: &str) -> String {
  let mut out = field.replace('_', " ");
  if let Some(first) = out.get_mut(0..1) {
    first.make_ascii_uppercase();
  }
  out
}

// ─── Read-only field rejection ───────────────────────────────────────────────

/// Reject caller-supplied values for server-computed fields.
///
/// `read_only` is the per-entity allow-list of field names the caller must
/// never set (`gross_profit`, timestamps, shadow metadata). The check runs
/// over the raw JSON object so it catches fields the typed input would
/// silently ignore.
pub fn reject_read_only(
  body: &serde_json::Value,
  read_only: &[&str],
) -> Result<(), FieldErrors> {
  let mut errors = FieldErrors::new();
  if let Some(map) = body.as_object() {
    for field in read_only {
      if map.contains_key(*field) {
        errors.push(field, format!("{} is read-only.", humanize(field)));
      }
    }
  }
  errors.into_result()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn field_errors_accumulate_per_field() {
    let mut errors = FieldErrors::new();
    errors.push("a", "first");
    errors.push("a", "second");
    errors.push("b", "third");

    assert!(errors.contains("a"));
    assert!(errors.contains("b"));
    assert_eq!(errors.iter().count(), 2);
  }

  #[test]
  fn empty_field_errors_convert_to_ok() {
    assert!(FieldErrors::new().into_result().is_ok());
  }

  #[test]
  fn percent_check_bounds() {
    let mut errors = FieldErrors::new();
    check_percent(&mut errors, "gold_recovery_rate", 0.0);
    check_percent(&mut errors, "gold_recovery_rate", 100.0);
    assert!(errors.is_empty());

    check_percent(&mut errors, "gold_recovery_rate", 100.01);
    check_percent(&mut errors, "operational_efficiency", -1.0);
    assert!(errors.contains("gold_recovery_rate"));
    assert!(errors.contains("operational_efficiency"));
  }

  #[test]
  fn read_only_fields_rejected() {
    let body = serde_json::json!({
      "date": "2024-11-15",
      "gross_profit": 12.0,
      "created_at": "2024-11-15T00:00:00Z",
    });
    let err =
      reject_read_only(&body, &["gross_profit", "created_at", "modified_at"])
        .unwrap_err();
    assert!(err.contains("gross_profit"));
    assert!(err.contains("created_at"));
    assert!(!err.contains("modified_at"));
  }
}
