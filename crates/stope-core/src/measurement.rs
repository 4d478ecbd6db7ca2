//! Date-stamped measurement entities: explosives inventory, stockpile
//! volumes, environmental metrics, energy usage, and smelted gold.
//!
//! All of these follow the same shape — a natural date key (or date + site
//! for smelted gold), non-negative numeric fields, server-set timestamps —
//! and each is shadow-tracked on every mutation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{
  FieldErrors, check_non_negative, check_non_negative_count, check_percent,
};

/// Timestamps are the only server-set fields on the plain measurement rows.
const TIMESTAMP_FIELDS: &[&str] = &["created_at", "modified_at"];

// ─── Explosives inventory ────────────────────────────────────────────────────

/// Explosives on hand at end of day. One row per date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosivesInventory {
  pub date:             NaiveDate,
  pub anfo_kg:          f64,
  pub emulsion_kg:      f64,
  pub detonators_count: i64,
  pub boosters_count:   i64,
  /// Replacement value of the stored explosives in USD.
  pub total_value:      f64,
  pub created_at:       DateTime<Utc>,
  pub modified_at:      DateTime<Utc>,
}

impl ExplosivesInventory {
  pub const READ_ONLY_FIELDS: &'static [&'static str] = TIMESTAMP_FIELDS;
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExplosivesInventory {
  pub date:             NaiveDate,
  pub anfo_kg:          f64,
  pub emulsion_kg:      f64,
  pub detonators_count: i64,
  pub boosters_count:   i64,
  pub total_value:      f64,
}

impl NewExplosivesInventory {
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_non_negative(&mut errors, "anfo_kg", self.anfo_kg);
    check_non_negative(&mut errors, "emulsion_kg", self.emulsion_kg);
    check_non_negative_count(&mut errors, "detonators_count", self.detonators_count);
    check_non_negative_count(&mut errors, "boosters_count", self.boosters_count);
    check_non_negative(&mut errors, "total_value", self.total_value);
    errors.into_result()
  }
}

// ─── Stockpile volume ────────────────────────────────────────────────────────

/// Surveyed stockpile state. One row per date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockpileVolume {
  pub date:        NaiveDate,
  pub ore_tons:    f64,
  pub waste_tons:  f64,
  /// Ore grade in grams per tonne.
  pub grade_gpt:   f64,
  pub location:    String,
  pub created_at:  DateTime<Utc>,
  pub modified_at: DateTime<Utc>,
}

impl StockpileVolume {
  pub const READ_ONLY_FIELDS: &'static [&'static str] = TIMESTAMP_FIELDS;
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStockpileVolume {
  pub date:       NaiveDate,
  pub ore_tons:   f64,
  pub waste_tons: f64,
  pub grade_gpt:  f64,
  pub location:   String,
}

impl NewStockpileVolume {
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_non_negative(&mut errors, "ore_tons", self.ore_tons);
    check_non_negative(&mut errors, "waste_tons", self.waste_tons);
    check_non_negative(&mut errors, "grade_gpt", self.grade_gpt);
    errors.into_result()
  }
}

// ─── Environmental metric ────────────────────────────────────────────────────

/// Daily environmental monitoring readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentalMetric {
  pub date:                   NaiveDate,
  /// PM10 particulate matter (μg/m³).
  pub dust_level_pm10:        f64,
  /// Average noise level in decibels.
  pub noise_level_db:         f64,
  /// Water consumption in cubic meters.
  pub water_usage_m3:         f64,
  /// Area under rehabilitation in square meters.
  pub rehabilitation_area_m2: f64,
  pub waste_water_ph:         f64,
  /// Carbon emissions in metric tons.
  pub carbon_emissions:       f64,
  /// Waste generated in metric tons.
  pub waste_generated:        f64,
  pub additional_notes:       Option<String>,
  pub created_at:             DateTime<Utc>,
  pub modified_at:            DateTime<Utc>,
}

impl EnvironmentalMetric {
  pub const READ_ONLY_FIELDS: &'static [&'static str] = TIMESTAMP_FIELDS;
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEnvironmentalMetric {
  pub date:                   NaiveDate,
  pub dust_level_pm10:        f64,
  pub noise_level_db:         f64,
  pub water_usage_m3:         f64,
  pub rehabilitation_area_m2: f64,
  pub waste_water_ph:         f64,
  pub carbon_emissions:       f64,
  pub waste_generated:        f64,
  pub additional_notes:       Option<String>,
}

impl NewEnvironmentalMetric {
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_non_negative(&mut errors, "dust_level_pm10", self.dust_level_pm10);
    check_non_negative(&mut errors, "noise_level_db", self.noise_level_db);
    check_non_negative(&mut errors, "water_usage_m3", self.water_usage_m3);
    check_non_negative(
      &mut errors,
      "rehabilitation_area_m2",
      self.rehabilitation_area_m2,
    );
    check_non_negative(&mut errors, "carbon_emissions", self.carbon_emissions);
    check_non_negative(&mut errors, "waste_generated", self.waste_generated);
    errors.into_result()
  }
}

// ─── Energy usage ────────────────────────────────────────────────────────────

/// Daily energy consumption and cost. `total_cost` is server-computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyUsage {
  pub date:             NaiveDate,
  pub electricity_kwh:  f64,
  pub electricity_cost: f64,
  pub diesel_liters:    f64,
  pub diesel_cost:      f64,
  /// Always `electricity_cost + diesel_cost`.
  pub total_cost:       f64,
  pub created_at:       DateTime<Utc>,
  pub modified_at:      DateTime<Utc>,
}

impl EnergyUsage {
  pub const READ_ONLY_FIELDS: &'static [&'static str] =
    &["total_cost", "created_at", "modified_at"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEnergyUsage {
  pub date:             NaiveDate,
  pub electricity_kwh:  f64,
  pub electricity_cost: f64,
  pub diesel_liters:    f64,
  pub diesel_cost:      f64,
}

impl NewEnergyUsage {
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_non_negative(&mut errors, "electricity_kwh", self.electricity_kwh);
    check_non_negative(&mut errors, "electricity_cost", self.electricity_cost);
    check_non_negative(&mut errors, "diesel_liters", self.diesel_liters);
    check_non_negative(&mut errors, "diesel_cost", self.diesel_cost);
    errors.into_result()
  }

  /// The server-computed cost total for this submission.
  pub fn total_cost(&self) -> f64 { self.electricity_cost + self.diesel_cost }
}

// ─── Smelted gold ────────────────────────────────────────────────────────────

/// A smelting output batch, attributed to a mining site.
/// Unique per `(date, site_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmeltedGold {
  pub id:                i64,
  pub date:              NaiveDate,
  pub site_id:           i64,
  /// Total weight in grams.
  pub total_weight:      f64,
  /// Purity of the smelted output, 0–100.
  pub purity_percentage: f64,
  pub notes:             Option<String>,
  pub created_at:        DateTime<Utc>,
  pub modified_at:       DateTime<Utc>,
}

impl SmeltedGold {
  pub const READ_ONLY_FIELDS: &'static [&'static str] =
    &["id", "created_at", "modified_at"];
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSmeltedGold {
  pub date:              NaiveDate,
  pub site_id:           i64,
  pub total_weight:      f64,
  pub purity_percentage: f64,
  pub notes:             Option<String>,
}

impl NewSmeltedGold {
  pub fn validate(&self) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_percent(&mut errors, "purity_percentage", self.purity_percentage);
    if self.total_weight < 0.0 {
      errors.push("total_weight", "Total weight cannot be negative.");
    }
    errors.into_result()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn smelted_gold_purity_out_of_range() {
    let input = NewSmeltedGold {
      date:              NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
      site_id:           1,
      total_weight:      50.0,
      purity_percentage: 105.0,
      notes:             None,
    };
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("purity_percentage"));
    assert!(!errors.contains("total_weight"));
  }

  #[test]
  fn smelted_gold_negative_weight() {
    let input = NewSmeltedGold {
      date:              NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
      site_id:           1,
      total_weight:      -1.0,
      purity_percentage: 99.5,
      notes:             None,
    };
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("total_weight"));
    assert!(!errors.contains("purity_percentage"));
  }

  #[test]
  fn energy_total_cost_is_sum_of_costs() {
    let input = NewEnergyUsage {
      date:             NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
      electricity_kwh:  50_000.0,
      electricity_cost: 7_500.0,
      diesel_liters:    1_000.0,
      diesel_cost:      2_000.0,
    };
    assert_eq!(input.total_cost(), 9_500.0);
    assert!(input.validate().is_ok());
  }

  #[test]
  fn explosives_all_negative_fields_reported_together() {
    let input = NewExplosivesInventory {
      date:             NaiveDate::from_ymd_opt(2024, 11, 15).unwrap(),
      anfo_kg:          -1.0,
      emulsion_kg:      -2.0,
      detonators_count: -3,
      boosters_count:   4,
      total_value:      100.0,
    };
    let errors = input.validate().unwrap_err();
    assert!(errors.contains("anfo_kg"));
    assert!(errors.contains("emulsion_kg"));
    assert!(errors.contains("detonators_count"));
    assert!(!errors.contains("boosters_count"));
  }
}
