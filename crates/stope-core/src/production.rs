//! The daily production log — one row per calendar day.
//!
//! `gross_profit` is always server-computed from `smelted_gold × gold_price`;
//! callers can never set it, nor the timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{FieldErrors, check_non_negative, check_percent};

/// A persisted production log. The natural key is `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProductionLog {
  pub date:                  NaiveDate,
  pub total_tonnage_crushed: f64,
  pub total_tonnage_hoisted: f64,
  pub total_tonnage_milled:  f64,
  /// Percentage of gold recovered, 0–100.
  pub gold_recovery_rate:    f64,
  /// Percentage of operational efficiency, 0–100.
  pub operational_efficiency: f64,
  /// Gold smelted in grams.
  pub smelted_gold:          f64,
  /// Daily gold price in USD per gram.
  pub gold_price:            f64,
  /// Gross profit in USD; always `smelted_gold * gold_price`.
  pub gross_profit:          f64,
  pub notes:                 Option<String>,
  pub created_at:            DateTime<Utc>,
  pub modified_at:           DateTime<Utc>,
}

impl DailyProductionLog {
  /// Fields the caller must never supply on write.
  pub const READ_ONLY_FIELDS: &'static [&'static str] =
    &["gross_profit", "created_at", "modified_at"];
}

/// Input for creating or replacing a production log.
/// Server-computed fields are absent by construction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDailyProductionLog {
  pub date:                  NaiveDate,
  pub total_tonnage_crushed: f64,
  pub total_tonnage_hoisted: f64,
  pub total_tonnage_milled:  Option<f64>,
  #[serde(default)]
  pub gold_recovery_rate:    f64,
  #[serde(default)]
  pub operational_efficiency: f64,
  #[serde(default)]
  pub smelted_gold:          f64,
  #[serde(default)]
  pub gold_price:            f64,
  pub notes:                 Option<String>,
}

impl NewDailyProductionLog {
  /// Run every field rule and report all violations together.
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(milled) = self.total_tonnage_milled
      && milled > self.total_tonnage_crushed
    {
      errors.push(
        "total_tonnage_milled",
        "Milled tonnage cannot exceed crushed tonnage.",
      );
    }

    check_percent(&mut errors, "gold_recovery_rate", self.gold_recovery_rate);
    check_percent(
      &mut errors,
      "operational_efficiency",
      self.operational_efficiency,
    );

    check_non_negative(
      &mut errors,
      "total_tonnage_crushed",
      self.total_tonnage_crushed,
    );
    check_non_negative(
      &mut errors,
      "total_tonnage_hoisted",
      self.total_tonnage_hoisted,
    );
    if let Some(milled) = self.total_tonnage_milled {
      check_non_negative(&mut errors, "total_tonnage_milled", milled);
    }
    check_non_negative(&mut errors, "smelted_gold", self.smelted_gold);
    check_non_negative(&mut errors, "gold_price", self.gold_price);

    errors.into_result()
  }

  /// The server-computed gross profit for this submission.
  pub fn gross_profit(&self) -> f64 { self.smelted_gold * self.gold_price }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base() -> NewDailyProductionLog {
    NewDailyProductionLog {
      date:                   NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
      total_tonnage_crushed:  1000.0,
      total_tonnage_hoisted:  1050.0,
      total_tonnage_milled:   Some(900.0),
      gold_recovery_rate:     92.5,
      operational_efficiency: 88.0,
      smelted_gold:           1200.0,
      gold_price:             75.0,
      notes:                  None,
    }
  }

  #[test]
  fn valid_log_passes() {
    assert!(base().validate().is_ok());
  }

  #[test]
  fn milled_exceeding_crushed_is_rejected() {
    let mut input = base();
    input.total_tonnage_milled = Some(1100.0);
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("total_tonnage_milled"));
  }

  #[test]
  fn missing_milled_skips_cross_field_rule() {
    let mut input = base();
    input.total_tonnage_milled = None;
    assert!(input.validate().is_ok());
  }

  #[test]
  fn out_of_range_percentages_rejected_together() {
    let mut input = base();
    input.gold_recovery_rate = 101.0;
    input.operational_efficiency = -3.0;
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("gold_recovery_rate"));
    assert!(errors.contains("operational_efficiency"));
  }

  #[test]
  fn gross_profit_is_product_of_gold_and_price() {
    let input = base();
    assert_eq!(input.gross_profit(), 1200.0 * 75.0);
  }
}
