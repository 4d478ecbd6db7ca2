//! The `OperationsStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `stope-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.
//!
//! Contract notes:
//! - Every write takes a [`ChangeContext`] and appends exactly one shadow row
//!   in the same transaction as the live write; if the shadow write fails the
//!   live write is rolled back.
//! - `update_*` methods are full-record replacements keyed by the path key;
//!   partial field persistence does not exist.
//! - Validation is the caller's job (`New*::validate()`); stores only enforce
//!   referential integrity and key uniqueness.

use std::future::Future;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
  history::{ChangeContext, HistoryEntry},
  labor::{LaborMetric, NewLaborMetric},
  measurement::{
    EnergyUsage, EnvironmentalMetric, ExplosivesInventory, NewEnergyUsage,
    NewEnvironmentalMetric, NewExplosivesInventory, NewSmeltedGold,
    NewStockpileVolume, SmeltedGold, StockpileVolume,
  },
  org::{MiningDepartment, MiningSite, NewDepartment, NewSite, Shift},
  production::{DailyProductionLog, NewDailyProductionLog},
  report::{DepartmentLaborSummary, EnergyReport, GoldProductionReport},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Inclusive date-range filter shared by list and report queries.
/// Both bounds are optional; an empty range means "everything".
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRange {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

/// Filter for [`OperationsStore::list_smelted_gold`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SmeltedGoldFilter {
  pub range:   DateRange,
  pub site_id: Option<i64>,
}

/// Filter for [`OperationsStore::list_labor_metrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LaborFilter {
  pub range:         DateRange,
  pub department_id: Option<i64>,
  pub shift_id:      Option<i64>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a stope storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait OperationsStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Daily production logs ─────────────────────────────────────────────

  fn create_production_log(
    &self,
    new: NewDailyProductionLog,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<DailyProductionLog, Self::Error>> + Send + '_;

  fn get_production_log(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<DailyProductionLog>, Self::Error>> + Send + '_;

  /// Ordered date-descending.
  fn list_production_logs(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<DailyProductionLog>, Self::Error>> + Send + '_;

  fn update_production_log(
    &self,
    date: NaiveDate,
    new: NewDailyProductionLog,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<DailyProductionLog, Self::Error>> + Send + '_;

  fn delete_production_log(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ordered latest-change-first; remains queryable after deletion.
  fn production_log_history(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<DailyProductionLog>>, Self::Error>>
  + Send
  + '_;

  // ── Explosives inventory ──────────────────────────────────────────────

  fn create_explosives_inventory(
    &self,
    new: NewExplosivesInventory,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<ExplosivesInventory, Self::Error>> + Send + '_;

  fn get_explosives_inventory(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<ExplosivesInventory>, Self::Error>> + Send + '_;

  fn list_explosives_inventory(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<ExplosivesInventory>, Self::Error>> + Send + '_;

  fn update_explosives_inventory(
    &self,
    date: NaiveDate,
    new: NewExplosivesInventory,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<ExplosivesInventory, Self::Error>> + Send + '_;

  fn delete_explosives_inventory(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn explosives_inventory_history(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<ExplosivesInventory>>, Self::Error>>
  + Send
  + '_;

  // ── Stockpile volumes ─────────────────────────────────────────────────

  fn create_stockpile_volume(
    &self,
    new: NewStockpileVolume,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<StockpileVolume, Self::Error>> + Send + '_;

  fn get_stockpile_volume(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<StockpileVolume>, Self::Error>> + Send + '_;

  fn list_stockpile_volumes(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<StockpileVolume>, Self::Error>> + Send + '_;

  fn update_stockpile_volume(
    &self,
    date: NaiveDate,
    new: NewStockpileVolume,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<StockpileVolume, Self::Error>> + Send + '_;

  fn delete_stockpile_volume(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn stockpile_volume_history(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<StockpileVolume>>, Self::Error>>
  + Send
  + '_;

  // ── Environmental metrics ─────────────────────────────────────────────

  fn create_environmental_metric(
    &self,
    new: NewEnvironmentalMetric,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<EnvironmentalMetric, Self::Error>> + Send + '_;

  fn get_environmental_metric(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<EnvironmentalMetric>, Self::Error>> + Send + '_;

  fn list_environmental_metrics(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<EnvironmentalMetric>, Self::Error>> + Send + '_;

  fn update_environmental_metric(
    &self,
    date: NaiveDate,
    new: NewEnvironmentalMetric,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<EnvironmentalMetric, Self::Error>> + Send + '_;

  fn delete_environmental_metric(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn environmental_metric_history(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<EnvironmentalMetric>>, Self::Error>>
  + Send
  + '_;

  // ── Energy usage ──────────────────────────────────────────────────────

  fn create_energy_usage(
    &self,
    new: NewEnergyUsage,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<EnergyUsage, Self::Error>> + Send + '_;

  fn get_energy_usage(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<EnergyUsage>, Self::Error>> + Send + '_;

  fn list_energy_usage(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<EnergyUsage>, Self::Error>> + Send + '_;

  fn update_energy_usage(
    &self,
    date: NaiveDate,
    new: NewEnergyUsage,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<EnergyUsage, Self::Error>> + Send + '_;

  fn delete_energy_usage(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn energy_usage_history(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<EnergyUsage>>, Self::Error>>
  + Send
  + '_;

  // ── Smelted gold ──────────────────────────────────────────────────────

  fn add_smelted_gold(
    &self,
    new: NewSmeltedGold,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<SmeltedGold, Self::Error>> + Send + '_;

  fn get_smelted_gold(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SmeltedGold>, Self::Error>> + Send + '_;

  fn list_smelted_gold(
    &self,
    filter: SmeltedGoldFilter,
  ) -> impl Future<Output = Result<Vec<SmeltedGold>, Self::Error>> + Send + '_;

  fn update_smelted_gold(
    &self,
    id: i64,
    new: NewSmeltedGold,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<SmeltedGold, Self::Error>> + Send + '_;

  fn delete_smelted_gold(
    &self,
    id: i64,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn smelted_gold_history(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<SmeltedGold>>, Self::Error>>
  + Send
  + '_;

  // ── Labor metrics ─────────────────────────────────────────────────────

  fn add_labor_metric(
    &self,
    new: NewLaborMetric,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<LaborMetric, Self::Error>> + Send + '_;

  fn get_labor_metric(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<LaborMetric>, Self::Error>> + Send + '_;

  fn list_labor_metrics(
    &self,
    filter: LaborFilter,
  ) -> impl Future<Output = Result<Vec<LaborMetric>, Self::Error>> + Send + '_;

  fn update_labor_metric(
    &self,
    id: i64,
    new: NewLaborMetric,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<LaborMetric, Self::Error>> + Send + '_;

  fn delete_labor_metric(
    &self,
    id: i64,
    ctx: ChangeContext,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn labor_metric_history(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Vec<HistoryEntry<LaborMetric>>, Self::Error>>
  + Send
  + '_;

  // ── Organization ──────────────────────────────────────────────────────

  fn add_department(
    &self,
    new: NewDepartment,
  ) -> impl Future<Output = Result<MiningDepartment, Self::Error>> + Send + '_;

  fn get_department(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<MiningDepartment>, Self::Error>> + Send + '_;

  fn list_departments(
    &self,
  ) -> impl Future<Output = Result<Vec<MiningDepartment>, Self::Error>> + Send + '_;

  fn add_site(
    &self,
    new: NewSite,
  ) -> impl Future<Output = Result<MiningSite, Self::Error>> + Send + '_;

  fn get_site(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<MiningSite>, Self::Error>> + Send + '_;

  fn list_sites(
    &self,
  ) -> impl Future<Output = Result<Vec<MiningSite>, Self::Error>> + Send + '_;

  fn get_shift(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Shift>, Self::Error>> + Send + '_;

  /// Shifts are generated by the v2 migration; this lists them, optionally
  /// restricted to one department.
  fn list_shifts(
    &self,
    department_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Shift>, Self::Error>> + Send + '_;

  // ── Reports (read-only, no shadow writes) ─────────────────────────────

  fn energy_report(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<EnergyReport, Self::Error>> + Send + '_;

  fn gold_production_report(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<GoldProductionReport, Self::Error>> + Send + '_;

  fn labor_report(
    &self,
    range: DateRange,
    department_id: Option<i64>,
  ) -> impl Future<Output = Result<Vec<DepartmentLaborSummary>, Self::Error>>
  + Send
  + '_;
}
