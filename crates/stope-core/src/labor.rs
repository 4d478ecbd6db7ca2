//! Labor metrics and the legacy shift enumeration.
//!
//! `LaborMetric.shift_id` references a generated [`crate::org::Shift`] row.
//! Before schema v2 the column held a bare [`ShiftLabel`]; the v2 migration
//! converts labels to per-department shift entities (see
//! `stope-store-sqlite::migrate`).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{
  FieldErrors, check_non_negative, check_non_negative_count,
};

// ─── Shift labels (legacy enumeration) ───────────────────────────────────────

/// The fixed shift enumeration used before shifts became entities.
/// Still used by the v2 migration and its reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftLabel {
  Morning,
  Afternoon,
  Night,
}

impl ShiftLabel {
  pub const ALL: [ShiftLabel; 3] =
    [ShiftLabel::Morning, ShiftLabel::Afternoon, ShiftLabel::Night];

  /// The stored enumeration value.
  pub fn as_str(self) -> &'static str {
    match self {
      ShiftLabel::Morning => "MORNING",
      ShiftLabel::Afternoon => "AFTERNOON",
      ShiftLabel::Night => "NIGHT",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "MORNING" => Some(ShiftLabel::Morning),
      "AFTERNOON" => Some(ShiftLabel::Afternoon),
      "NIGHT" => Some(ShiftLabel::Night),
      _ => None,
    }
  }

  /// Display name of the shift entity generated for this label.
  pub fn shift_name(self) -> &'static str {
    match self {
      ShiftLabel::Morning => "Morning Shift",
      ShiftLabel::Afternoon => "Afternoon Shift",
      ShiftLabel::Night => "Night Shift",
    }
  }

  /// Fixed schedule for the generated shift entity.
  pub fn schedule(self) -> (NaiveTime, NaiveTime) {
    let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or_default();
    match self {
      ShiftLabel::Morning => (t(6), t(14)),
      ShiftLabel::Afternoon => (t(14), t(22)),
      ShiftLabel::Night => (t(22), t(6)),
    }
  }

  /// Infer the original label from a shift's display name, used by the
  /// reverse migration. Matches on substring, so it is only exact while
  /// shift names retain their generated form; a renamed shift cannot be
  /// mapped back and its labor rows revert to a NULL label.
  pub fn from_shift_name(name: &str) -> Option<Self> {
    if name.contains("Morning") {
      Some(ShiftLabel::Morning)
    } else if name.contains("Afternoon") {
      Some(ShiftLabel::Afternoon)
    } else if name.contains("Night") {
      Some(ShiftLabel::Night)
    } else {
      None
    }
  }
}

// ─── Labor metric ────────────────────────────────────────────────────────────

/// Per-shift labor figures for a department on a given day.
/// Unique per `(date, department_id, shift_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaborMetric {
  pub id:                 i64,
  pub date:               NaiveDate,
  pub department_id:      i64,
  /// NULL when the row predates the shift migration and had no mapping.
  pub shift_id:           Option<i64>,
  pub workers_present:    i64,
  pub hours_worked:       f64,
  pub overtime_hours:     f64,
  pub productivity_index: f64,
  pub safety_incidents:   i64,
  pub created_at:         DateTime<Utc>,
  pub modified_at:        DateTime<Utc>,
}

impl LaborMetric {
  pub const READ_ONLY_FIELDS: &'static [&'static str] =
    &["id", "created_at", "modified_at"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLaborMetric {
  pub date:               NaiveDate,
  pub department_id:      i64,
  pub shift_id:           Option<i64>,
  pub workers_present:    i64,
  pub hours_worked:       f64,
  #[serde(default)]
  pub overtime_hours:     f64,
  pub productivity_index: f64,
  #[serde(default)]
  pub safety_incidents:   i64,
}

impl NewLaborMetric {
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_non_negative_count(&mut errors, "workers_present", self.workers_present);
    check_non_negative(&mut errors, "hours_worked", self.hours_worked);
    check_non_negative(&mut errors, "overtime_hours", self.overtime_hours);
    check_non_negative(&mut errors, "productivity_index", self.productivity_index);
    check_non_negative_count(&mut errors, "safety_incidents", self.safety_incidents);
    errors.into_result()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_roundtrip() {
    for label in ShiftLabel::ALL {
      assert_eq!(ShiftLabel::parse(label.as_str()), Some(label));
    }
    assert_eq!(ShiftLabel::parse("SWING"), None);
  }

  #[test]
  fn generated_name_maps_back_to_label() {
    for label in ShiftLabel::ALL {
      assert_eq!(ShiftLabel::from_shift_name(label.shift_name()), Some(label));
    }
    assert_eq!(ShiftLabel::from_shift_name("Graveyard Shift"), None);
  }

  #[test]
  fn schedules_match_fixed_times() {
    let (start, end) = ShiftLabel::Morning.schedule();
    assert_eq!(start.to_string(), "06:00:00");
    assert_eq!(end.to_string(), "14:00:00");

    let (start, end) = ShiftLabel::Night.schedule();
    assert_eq!(start.to_string(), "22:00:00");
    assert_eq!(end.to_string(), "06:00:00");
  }

  #[test]
  fn negative_labor_figures_rejected() {
    let input = NewLaborMetric {
      date:               NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
      department_id:      1,
      shift_id:           None,
      workers_present:    -5,
      hours_worked:       8.0,
      overtime_hours:     -1.0,
      productivity_index: 0.9,
      safety_incidents:   0,
    };
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("workers_present"));
    assert!(errors.contains("overtime_hours"));
    assert!(!errors.contains("hours_worked"));
  }
}
