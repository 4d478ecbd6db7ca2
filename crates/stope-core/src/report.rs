//! Aggregate report types — computed read models, never stored.

use serde::Serialize;

/// Energy consumption and cost totals over a date range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnergyReport {
  pub days:                   i64,
  pub total_electricity_kwh:  f64,
  pub total_electricity_cost: f64,
  pub total_diesel_liters:    f64,
  pub total_diesel_cost:      f64,
  pub total_cost:             f64,
}

/// Gold production totals and averages over a date range,
/// derived from the daily production logs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GoldProductionReport {
  pub days:                       i64,
  pub total_smelted_gold:         f64,
  pub total_gross_profit:         f64,
  pub total_tonnage_milled:       f64,
  /// Simple average over the logs in range; 0 when the range is empty.
  pub avg_gold_recovery_rate:     f64,
  pub avg_operational_efficiency: f64,
}

/// Labor totals for one department over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentLaborSummary {
  pub department_id:          i64,
  pub department_name:        String,
  pub total_workers_present:  i64,
  pub total_hours_worked:     f64,
  pub total_overtime_hours:   f64,
  pub avg_productivity_index: f64,
  pub total_safety_incidents: i64,
}
