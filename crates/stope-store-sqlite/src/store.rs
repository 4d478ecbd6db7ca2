//! [`SqliteStore`] and its [`OperationsStore`] implementation.
//!
//! The five purely date-keyed entities share one code path via the private
//! [`DatedRecord`] trait; smelted gold and labor metrics are id-keyed and
//! carry referential pre-checks, so they get explicit methods.
//!
//! Every mutation runs in one SQLite transaction that writes the live row
//! and appends its shadow row; a failure on either side rolls back both.

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension, params, params_from_iter, types::Value};
use stope_core::{
  history::{ChangeContext, ChangeKind, HistoryEntry},
  labor::{LaborMetric, NewLaborMetric},
  measurement::{
    EnergyUsage, EnvironmentalMetric, ExplosivesInventory, NewEnergyUsage,
    NewEnvironmentalMetric, NewExplosivesInventory, NewSmeltedGold,
    NewStockpileVolume, SmeltedGold, StockpileVolume,
  },
  org::{MiningDepartment, MiningSite, NewDepartment, NewSite, Shift},
  production::{DailyProductionLog, NewDailyProductionLog},
  report::{DepartmentLaborSummary, EnergyReport, GoldProductionReport},
  store::{DateRange, LaborFilter, OperationsStore, SmeltedGoldFilter},
};

use crate::{
  Error, Result,
  encode::{change_col, date_col, dt_col, encode_date, encode_dt, time_col},
  migrate,
};

/// SQLite-backed operations store.
///
/// All database access goes through a [`tokio_rusqlite::Connection`], which
/// runs blocking SQLite calls on a dedicated thread. Cloning is cheap — the
/// inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (creating if needed) the database at `path` and migrate it to
  /// [`migrate::LATEST_VERSION`].
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// In-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(
          "PRAGMA journal_mode = WAL;
           PRAGMA foreign_keys = ON;",
        )?;
        Ok(migrate::upgrade(conn))
      })
      .await??;
    Ok(Self { conn })
  }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// A write that could not commit atomically with its shadow row.
fn write_failure(e: tokio_rusqlite::Error) -> Error {
  Error::Transaction(e.to_string())
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

fn opt_text(s: &Option<String>) -> Value {
  s.clone().map(Value::Text).unwrap_or(Value::Null)
}

fn row_exists(
  tx: &rusqlite::Transaction<'_>,
  table: &str,
  key_col: &str,
  id: i64,
) -> rusqlite::Result<bool> {
  tx.query_row(
    &format!("SELECT 1 FROM {table} WHERE {key_col} = ?1"),
    params![id],
    |_| Ok(()),
  )
  .optional()
  .map(|found| found.is_some())
}

/// Append one shadow row by copying the live row as it stands right now.
/// Returns the number of rows copied (0 when the live row does not exist).
fn snapshot(
  tx: &rusqlite::Transaction<'_>,
  live: &str,
  history: &str,
  columns: &str,
  key_col: &str,
  key: &Value,
  change: ChangeKind,
  ctx: &ChangeContext,
  now: &str,
) -> rusqlite::Result<usize> {
  tx.execute(
    &format!(
      "INSERT INTO {history}
         ({columns}, history_at, history_change, history_reason, history_user)
       SELECT {columns}, ?2, ?3, ?4, ?5 FROM {live} WHERE {key_col} = ?1"
    ),
    params![key, now, change.as_str(), ctx.reason, ctx.user],
  )
}

const HISTORY_EXTRAS: &str =
  "history_id, history_at, history_change, history_reason, history_user";

/// Read the change envelope columns starting at `base`.
fn history_envelope<T>(
  row: &rusqlite::Row<'_>,
  base: usize,
  record: T,
) -> rusqlite::Result<HistoryEntry<T>> {
  Ok(HistoryEntry {
    history_id:  row.get(base)?,
    recorded_at: dt_col(row, base + 1)?,
    change:      change_col(row, base + 2)?,
    reason:      row.get(base + 3)?,
    user:        row.get(base + 4)?,
    record,
  })
}

/// Build `WHERE` conditions for an inclusive date range, pushing bound
/// parameters onto `binds`. Dates are TEXT `YYYY-MM-DD`, so string
/// comparison is date comparison.
fn range_conditions(
  range: &DateRange,
  column: &str,
  conds: &mut Vec<String>,
  binds: &mut Vec<Value>,
) {
  if let Some(from) = range.from {
    binds.push(Value::Text(encode_date(from)));
    conds.push(format!("{column} >= ?{}", binds.len()));
  }
  if let Some(to) = range.to {
    binds.push(Value::Text(encode_date(to)));
    conds.push(format!("{column} <= ?{}", binds.len()));
  }
}

fn where_clause(conds: &[String]) -> String {
  if conds.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", conds.join(" AND "))
  }
}

// ─── Date-keyed entities ─────────────────────────────────────────────────────

/// One of the five entities keyed purely by calendar date. Implementors
/// describe their table shape; the generic helpers below supply the CRUD,
/// shadow-write, and history logic once.
trait DatedRecord: Sized + Send + 'static {
  /// The write-side input type. Server-computed columns are produced by
  /// [`DatedRecord::values`], not carried on `New`.
  type New: Send + 'static;

  const ENTITY: &'static str;
  const LIVE: &'static str;
  const HISTORY: &'static str;
  /// Data columns between `date` and the timestamps, in schema order.
  const COLUMNS: &'static [&'static str];

  fn date(new: &Self::New) -> NaiveDate;
  /// Values for [`DatedRecord::COLUMNS`], computed fields included.
  fn values(new: &Self::New) -> Vec<Value>;
  /// Read a row shaped `date, {COLUMNS}, created_at, modified_at`.
  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

fn dated_cols<T: DatedRecord>() -> String {
  format!("date, {}, created_at, modified_at", T::COLUMNS.join(", "))
}

fn dated_insert_sql<T: DatedRecord>() -> String {
  let placeholders = (1..=T::COLUMNS.len() + 3)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    T::LIVE,
    dated_cols::<T>()
  )
}

fn dated_update_sql<T: DatedRecord>() -> String {
  let sets = T::COLUMNS
    .iter()
    .enumerate()
    .map(|(i, col)| format!("{col} = ?{}", i + 2))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "UPDATE {} SET {sets}, modified_at = ?{} WHERE date = ?1",
    T::LIVE,
    T::COLUMNS.len() + 2
  )
}

fn dated_select_one_sql<T: DatedRecord>() -> String {
  format!("SELECT {} FROM {} WHERE date = ?1", dated_cols::<T>(), T::LIVE)
}

impl SqliteStore {
  async fn create_dated<T: DatedRecord>(
    &self,
    new: T::New,
    ctx: ChangeContext,
  ) -> Result<T> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());
        let date = encode_date(T::date(&new));

        let mut binds = Vec::with_capacity(T::COLUMNS.len() + 3);
        binds.push(Value::Text(date.clone()));
        binds.extend(T::values(&new));
        binds.push(Value::Text(now.clone()));
        binds.push(Value::Text(now.clone()));
        if let Err(e) = tx.execute(&dated_insert_sql::<T>(), params_from_iter(binds)) {
          if is_constraint_violation(&e) {
            return Ok(Err(Error::DuplicateKey { entity: T::ENTITY, key: date }));
          }
          return Err(e.into());
        }

        let key = Value::Text(date.clone());
        snapshot(
          &tx,
          T::LIVE,
          T::HISTORY,
          &dated_cols::<T>(),
          "date",
          &key,
          ChangeKind::Created,
          &ctx,
          &now,
        )?;
        let record =
          tx.query_row(&dated_select_one_sql::<T>(), params![date], |r| T::from_row(r))?;
        tx.commit()?;
        Ok(Ok(record))
      })
      .await
      .map_err(write_failure)?
  }

  async fn get_dated<T: DatedRecord>(&self, date: NaiveDate) -> Result<Option<T>> {
    let date = encode_date(date);
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(&dated_select_one_sql::<T>(), params![date], |r| {
                T::from_row(r)
              })
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_dated<T: DatedRecord>(&self, range: DateRange) -> Result<Vec<T>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          range_conditions(&range, "date", &mut conds, &mut binds);
          let sql = format!(
            "SELECT {} FROM {}{} ORDER BY date DESC",
            dated_cols::<T>(),
            T::LIVE,
            where_clause(&conds)
          );
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(params_from_iter(binds), |r| T::from_row(r))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn update_dated<T: DatedRecord>(
    &self,
    date: NaiveDate,
    new: T::New,
    ctx: ChangeContext,
  ) -> Result<T> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());
        let date = encode_date(date);

        let mut binds = Vec::with_capacity(T::COLUMNS.len() + 2);
        binds.push(Value::Text(date.clone()));
        binds.extend(T::values(&new));
        binds.push(Value::Text(now.clone()));
        let changed = tx.execute(&dated_update_sql::<T>(), params_from_iter(binds))?;
        if changed == 0 {
          return Ok(Err(Error::RecordNotFound { entity: T::ENTITY, key: date }));
        }

        let key = Value::Text(date.clone());
        snapshot(
          &tx,
          T::LIVE,
          T::HISTORY,
          &dated_cols::<T>(),
          "date",
          &key,
          ChangeKind::Changed,
          &ctx,
          &now,
        )?;
        let record =
          tx.query_row(&dated_select_one_sql::<T>(), params![date], |r| T::from_row(r))?;
        tx.commit()?;
        Ok(Ok(record))
      })
      .await
      .map_err(write_failure)?
  }

  async fn delete_dated<T: DatedRecord>(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());
        let date = encode_date(date);

        // Snapshot first; deleting would lose the final field values.
        let key = Value::Text(date.clone());
        let copied = snapshot(
          &tx,
          T::LIVE,
          T::HISTORY,
          &dated_cols::<T>(),
          "date",
          &key,
          ChangeKind::Deleted,
          &ctx,
          &now,
        )?;
        if copied == 0 {
          return Ok(Err(Error::RecordNotFound { entity: T::ENTITY, key: date }));
        }
        tx.execute(
          &format!("DELETE FROM {} WHERE date = ?1", T::LIVE),
          params![date],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(write_failure)?
  }

  async fn history_dated<T: DatedRecord>(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<HistoryEntry<T>>> {
    let date = encode_date(date);
    Ok(
      self
        .conn
        .call(move |conn| {
          let sql = format!(
            "SELECT {}, {HISTORY_EXTRAS} FROM {} WHERE date = ?1
             ORDER BY history_at DESC, history_id DESC",
            dated_cols::<T>(),
            T::HISTORY
          );
          let base = T::COLUMNS.len() + 3;
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(params![date], |r| history_envelope(r, base, T::from_row(r)?))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }
}

impl DatedRecord for DailyProductionLog {
  type New = NewDailyProductionLog;

  const ENTITY: &'static str = "production log";
  const LIVE: &'static str = "production_logs";
  const HISTORY: &'static str = "production_logs_history";
  const COLUMNS: &'static [&'static str] = &[
    "total_tonnage_crushed",
    "total_tonnage_hoisted",
    "total_tonnage_milled",
    "gold_recovery_rate",
    "operational_efficiency",
    "smelted_gold",
    "gold_price",
    "gross_profit",
    "notes",
  ];

  fn date(new: &Self::New) -> NaiveDate { new.date }

  fn values(new: &Self::New) -> Vec<Value> {
    vec![
      new.total_tonnage_crushed.into(),
      new.total_tonnage_hoisted.into(),
      new.total_tonnage_milled.unwrap_or(0.0).into(),
      new.gold_recovery_rate.into(),
      new.operational_efficiency.into(),
      new.smelted_gold.into(),
      new.gold_price.into(),
      new.gross_profit().into(),
      opt_text(&new.notes),
    ]
  }

  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:                   date_col(row, 0)?,
      total_tonnage_crushed:  row.get(1)?,
      total_tonnage_hoisted:  row.get(2)?,
      total_tonnage_milled:   row.get(3)?,
      gold_recovery_rate:     row.get(4)?,
      operational_efficiency: row.get(5)?,
      smelted_gold:           row.get(6)?,
      gold_price:             row.get(7)?,
      gross_profit:           row.get(8)?,
      notes:                  row.get(9)?,
      created_at:             dt_col(row, 10)?,
      modified_at:            dt_col(row, 11)?,
    })
  }
}

impl DatedRecord for ExplosivesInventory {
  type New = NewExplosivesInventory;

  const ENTITY: &'static str = "explosives inventory";
  const LIVE: &'static str = "explosives_inventory";
  const HISTORY: &'static str = "explosives_inventory_history";
  const COLUMNS: &'static [&'static str] = &[
    "anfo_kg",
    "emulsion_kg",
    "detonators_count",
    "boosters_count",
    "total_value",
  ];

  fn date(new: &Self::New) -> NaiveDate { new.date }

  fn values(new: &Self::New) -> Vec<Value> {
    vec![
      new.anfo_kg.into(),
      new.emulsion_kg.into(),
      new.detonators_count.into(),
      new.boosters_count.into(),
      new.total_value.into(),
    ]
  }

  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:             date_col(row, 0)?,
      anfo_kg:          row.get(1)?,
      emulsion_kg:      row.get(2)?,
      detonators_count: row.get(3)?,
      boosters_count:   row.get(4)?,
      total_value:      row.get(5)?,
      created_at:       dt_col(row, 6)?,
      modified_at:      dt_col(row, 7)?,
    })
  }
}

impl DatedRecord for StockpileVolume {
  type New = NewStockpileVolume;

  const ENTITY: &'static str = "stockpile volume";
  const LIVE: &'static str = "stockpile_volumes";
  const HISTORY: &'static str = "stockpile_volumes_history";
  const COLUMNS: &'static [&'static str] =
    &["ore_tons", "waste_tons", "grade_gpt", "location"];

  fn date(new: &Self::New) -> NaiveDate { new.date }

  fn values(new: &Self::New) -> Vec<Value> {
    vec![
      new.ore_tons.into(),
      new.waste_tons.into(),
      new.grade_gpt.into(),
      new.location.clone().into(),
    ]
  }

  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:        date_col(row, 0)?,
      ore_tons:    row.get(1)?,
      waste_tons:  row.get(2)?,
      grade_gpt:   row.get(3)?,
      location:    row.get(4)?,
      created_at:  dt_col(row, 5)?,
      modified_at: dt_col(row, 6)?,
    })
  }
}

impl DatedRecord for EnvironmentalMetric {
  type New = NewEnvironmentalMetric;

  const ENTITY: &'static str = "environmental metric";
  const LIVE: &'static str = "environmental_metrics";
  const HISTORY: &'static str = "environmental_metrics_history";
  const COLUMNS: &'static [&'static str] = &[
    "dust_level_pm10",
    "noise_level_db",
    "water_usage_m3",
    "rehabilitation_area_m2",
    "waste_water_ph",
    "carbon_emissions",
    "waste_generated",
    "additional_notes",
  ];

  fn date(new: &Self::New) -> NaiveDate { new.date }

  fn values(new: &Self::New) -> Vec<Value> {
    vec![
      new.dust_level_pm10.into(),
      new.noise_level_db.into(),
      new.water_usage_m3.into(),
      new.rehabilitation_area_m2.into(),
      new.waste_water_ph.into(),
      new.carbon_emissions.into(),
      new.waste_generated.into(),
      opt_text(&new.additional_notes),
    ]
  }

  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:                   date_col(row, 0)?,
      dust_level_pm10:        row.get(1)?,
      noise_level_db:         row.get(2)?,
      water_usage_m3:         row.get(3)?,
      rehabilitation_area_m2: row.get(4)?,
      waste_water_ph:         row.get(5)?,
      carbon_emissions:       row.get(6)?,
      waste_generated:        row.get(7)?,
      additional_notes:       row.get(8)?,
      created_at:             dt_col(row, 9)?,
      modified_at:            dt_col(row, 10)?,
    })
  }
}

impl DatedRecord for EnergyUsage {
  type New = NewEnergyUsage;

  const ENTITY: &'static str = "energy usage";
  const LIVE: &'static str = "energy_usage";
  const HISTORY: &'static str = "energy_usage_history";
  const COLUMNS: &'static [&'static str] = &[
    "electricity_kwh",
    "electricity_cost",
    "diesel_liters",
    "diesel_cost",
    "total_cost",
  ];

  fn date(new: &Self::New) -> NaiveDate { new.date }

  fn values(new: &Self::New) -> Vec<Value> {
    vec![
      new.electricity_kwh.into(),
      new.electricity_cost.into(),
      new.diesel_liters.into(),
      new.diesel_cost.into(),
      new.total_cost().into(),
    ]
  }

  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      date:             date_col(row, 0)?,
      electricity_kwh:  row.get(1)?,
      electricity_cost: row.get(2)?,
      diesel_liters:    row.get(3)?,
      diesel_cost:      row.get(4)?,
      total_cost:       row.get(5)?,
      created_at:       dt_col(row, 6)?,
      modified_at:      dt_col(row, 7)?,
    })
  }
}

// ─── Id-keyed entities ───────────────────────────────────────────────────────

const SMELTED_COLS: &str = "id, date, site_id, total_weight, purity_percentage, \
                            notes, created_at, modified_at";

fn smelted_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SmeltedGold> {
  Ok(SmeltedGold {
    id:                row.get(0)?,
    date:              date_col(row, 1)?,
    site_id:           row.get(2)?,
    total_weight:      row.get(3)?,
    purity_percentage: row.get(4)?,
    notes:             row.get(5)?,
    created_at:        dt_col(row, 6)?,
    modified_at:       dt_col(row, 7)?,
  })
}

const LABOR_COLS: &str = "id, date, department_id, shift_id, workers_present, \
                          hours_worked, overtime_hours, productivity_index, \
                          safety_incidents, created_at, modified_at";

fn labor_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LaborMetric> {
  Ok(LaborMetric {
    id:                 row.get(0)?,
    date:               date_col(row, 1)?,
    department_id:      row.get(2)?,
    shift_id:           row.get(3)?,
    workers_present:    row.get(4)?,
    hours_worked:       row.get(5)?,
    overtime_hours:     row.get(6)?,
    productivity_index: row.get(7)?,
    safety_incidents:   row.get(8)?,
    created_at:         dt_col(row, 9)?,
    modified_at:        dt_col(row, 10)?,
  })
}

/// Referential pre-checks for a labor metric write.
fn check_labor_refs(
  tx: &rusqlite::Transaction<'_>,
  new: &NewLaborMetric,
) -> rusqlite::Result<std::result::Result<(), Error>> {
  if !row_exists(tx, "departments", "department_id", new.department_id)? {
    return Ok(Err(Error::DepartmentNotFound(new.department_id)));
  }
  if let Some(shift_id) = new.shift_id
    && !row_exists(tx, "shifts", "shift_id", shift_id)?
  {
    return Ok(Err(Error::ShiftNotFound(shift_id)));
  }
  Ok(Ok(()))
}

fn id_history_sql(history: &str, columns: &str) -> String {
  format!(
    "SELECT {columns}, {HISTORY_EXTRAS} FROM {history} WHERE id = ?1
     ORDER BY history_at DESC, history_id DESC"
  )
}

// ─── OperationsStore ─────────────────────────────────────────────────────────

impl OperationsStore for SqliteStore {
  type Error = Error;

  // ── Daily production logs ─────────────────────────────────────────────

  async fn create_production_log(
    &self,
    new: NewDailyProductionLog,
    ctx: ChangeContext,
  ) -> Result<DailyProductionLog> {
    self.create_dated(new, ctx).await
  }

  async fn get_production_log(
    &self,
    date: NaiveDate,
  ) -> Result<Option<DailyProductionLog>> {
    self.get_dated(date).await
  }

  async fn list_production_logs(
    &self,
    range: DateRange,
  ) -> Result<Vec<DailyProductionLog>> {
    self.list_dated(range).await
  }

  async fn update_production_log(
    &self,
    date: NaiveDate,
    new: NewDailyProductionLog,
    ctx: ChangeContext,
  ) -> Result<DailyProductionLog> {
    self.update_dated(date, new, ctx).await
  }

  async fn delete_production_log(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> Result<()> {
    self.delete_dated::<DailyProductionLog>(date, ctx).await
  }

  async fn production_log_history(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<HistoryEntry<DailyProductionLog>>> {
    self.history_dated(date).await
  }

  // ── Explosives inventory ──────────────────────────────────────────────

  async fn create_explosives_inventory(
    &self,
    new: NewExplosivesInventory,
    ctx: ChangeContext,
  ) -> Result<ExplosivesInventory> {
    self.create_dated(new, ctx).await
  }

  async fn get_explosives_inventory(
    &self,
    date: NaiveDate,
  ) -> Result<Option<ExplosivesInventory>> {
    self.get_dated(date).await
  }

  async fn list_explosives_inventory(
    &self,
    range: DateRange,
  ) -> Result<Vec<ExplosivesInventory>> {
    self.list_dated(range).await
  }

  async fn update_explosives_inventory(
    &self,
    date: NaiveDate,
    new: NewExplosivesInventory,
    ctx: ChangeContext,
  ) -> Result<ExplosivesInventory> {
    self.update_dated(date, new, ctx).await
  }

  async fn delete_explosives_inventory(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> Result<()> {
    self.delete_dated::<ExplosivesInventory>(date, ctx).await
  }

  async fn explosives_inventory_history(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<HistoryEntry<ExplosivesInventory>>> {
    self.history_dated(date).await
  }

  // ── Stockpile volumes ─────────────────────────────────────────────────

  async fn create_stockpile_volume(
    &self,
    new: NewStockpileVolume,
    ctx: ChangeContext,
  ) -> Result<StockpileVolume> {
    self.create_dated(new, ctx).await
  }

  async fn get_stockpile_volume(
    &self,
    date: NaiveDate,
  ) -> Result<Option<StockpileVolume>> {
    self.get_dated(date).await
  }

  async fn list_stockpile_volumes(
    &self,
    range: DateRange,
  ) -> Result<Vec<StockpileVolume>> {
    self.list_dated(range).await
  }

  async fn update_stockpile_volume(
    &self,
    date: NaiveDate,
    new: NewStockpileVolume,
    ctx: ChangeContext,
  ) -> Result<StockpileVolume> {
    self.update_dated(date, new, ctx).await
  }

  async fn delete_stockpile_volume(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> Result<()> {
    self.delete_dated::<StockpileVolume>(date, ctx).await
  }

  async fn stockpile_volume_history(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<HistoryEntry<StockpileVolume>>> {
    self.history_dated(date).await
  }

  // ── Environmental metrics ─────────────────────────────────────────────

  async fn create_environmental_metric(
    &self,
    new: NewEnvironmentalMetric,
    ctx: ChangeContext,
  ) -> Result<EnvironmentalMetric> {
    self.create_dated(new, ctx).await
  }

  async fn get_environmental_metric(
    &self,
    date: NaiveDate,
  ) -> Result<Option<EnvironmentalMetric>> {
    self.get_dated(date).await
  }

  async fn list_environmental_metrics(
    &self,
    range: DateRange,
  ) -> Result<Vec<EnvironmentalMetric>> {
    self.list_dated(range).await
  }

  async fn update_environmental_metric(
    &self,
    date: NaiveDate,
    new: NewEnvironmentalMetric,
    ctx: ChangeContext,
  ) -> Result<EnvironmentalMetric> {
    self.update_dated(date, new, ctx).await
  }

  async fn delete_environmental_metric(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> Result<()> {
    self.delete_dated::<EnvironmentalMetric>(date, ctx).await
  }

  async fn environmental_metric_history(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<HistoryEntry<EnvironmentalMetric>>> {
    self.history_dated(date).await
  }

  // ── Energy usage ──────────────────────────────────────────────────────

  async fn create_energy_usage(
    &self,
    new: NewEnergyUsage,
    ctx: ChangeContext,
  ) -> Result<EnergyUsage> {
    self.create_dated(new, ctx).await
  }

  async fn get_energy_usage(&self, date: NaiveDate) -> Result<Option<EnergyUsage>> {
    self.get_dated(date).await
  }

  async fn list_energy_usage(&self, range: DateRange) -> Result<Vec<EnergyUsage>> {
    self.list_dated(range).await
  }

  async fn update_energy_usage(
    &self,
    date: NaiveDate,
    new: NewEnergyUsage,
    ctx: ChangeContext,
  ) -> Result<EnergyUsage> {
    self.update_dated(date, new, ctx).await
  }

  async fn delete_energy_usage(
    &self,
    date: NaiveDate,
    ctx: ChangeContext,
  ) -> Result<()> {
    self.delete_dated::<EnergyUsage>(date, ctx).await
  }

  async fn energy_usage_history(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<HistoryEntry<EnergyUsage>>> {
    self.history_dated(date).await
  }

  // ── Smelted gold ──────────────────────────────────────────────────────

  async fn add_smelted_gold(
    &self,
    new: NewSmeltedGold,
    ctx: ChangeContext,
  ) -> Result<SmeltedGold> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());

        if !row_exists(&tx, "sites", "site_id", new.site_id)? {
          return Ok(Err(Error::SiteNotFound(new.site_id)));
        }

        let date = encode_date(new.date);
        if let Err(e) = tx.execute(
          "INSERT INTO smelted_gold
             (date, site_id, total_weight, purity_percentage, notes,
              created_at, modified_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            date,
            new.site_id,
            new.total_weight,
            new.purity_percentage,
            new.notes,
            now,
            now
          ],
        ) {
          if is_constraint_violation(&e) {
            return Ok(Err(Error::DuplicateKey {
              entity: "smelted gold",
              key:    format!("{date} (site {})", new.site_id),
            }));
          }
          return Err(e.into());
        }

        let id = tx.last_insert_rowid();
        snapshot(
          &tx,
          "smelted_gold",
          "smelted_gold_history",
          SMELTED_COLS,
          "id",
          &Value::Integer(id),
          ChangeKind::Created,
          &ctx,
          &now,
        )?;
        let record = tx.query_row(
          &format!("SELECT {SMELTED_COLS} FROM smelted_gold WHERE id = ?1"),
          params![id],
          smelted_from_row,
        )?;
        tx.commit()?;
        Ok(Ok(record))
      })
      .await
      .map_err(write_failure)?
  }

  async fn get_smelted_gold(&self, id: i64) -> Result<Option<SmeltedGold>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {SMELTED_COLS} FROM smelted_gold WHERE id = ?1"),
                params![id],
                smelted_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_smelted_gold(
    &self,
    filter: SmeltedGoldFilter,
  ) -> Result<Vec<SmeltedGold>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          range_conditions(&filter.range, "date", &mut conds, &mut binds);
          if let Some(site_id) = filter.site_id {
            binds.push(Value::Integer(site_id));
            conds.push(format!("site_id = ?{}", binds.len()));
          }
          let sql = format!(
            "SELECT {SMELTED_COLS} FROM smelted_gold{}
             ORDER BY date DESC, id DESC",
            where_clause(&conds)
          );
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(params_from_iter(binds), smelted_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn update_smelted_gold(
    &self,
    id: i64,
    new: NewSmeltedGold,
    ctx: ChangeContext,
  ) -> Result<SmeltedGold> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());

        if !row_exists(&tx, "sites", "site_id", new.site_id)? {
          return Ok(Err(Error::SiteNotFound(new.site_id)));
        }

        let date = encode_date(new.date);
        let changed = match tx.execute(
          "UPDATE smelted_gold
           SET date = ?2, site_id = ?3, total_weight = ?4,
               purity_percentage = ?5, notes = ?6, modified_at = ?7
           WHERE id = ?1",
          params![
            id,
            date,
            new.site_id,
            new.total_weight,
            new.purity_percentage,
            new.notes,
            now
          ],
        ) {
          Ok(n) => n,
          Err(e) if is_constraint_violation(&e) => {
            return Ok(Err(Error::DuplicateKey {
              entity: "smelted gold",
              key:    format!("{date} (site {})", new.site_id),
            }));
          }
          Err(e) => return Err(e.into()),
        };
        if changed == 0 {
          return Ok(Err(Error::RecordNotFound {
            entity: "smelted gold",
            key:    id.to_string(),
          }));
        }

        snapshot(
          &tx,
          "smelted_gold",
          "smelted_gold_history",
          SMELTED_COLS,
          "id",
          &Value::Integer(id),
          ChangeKind::Changed,
          &ctx,
          &now,
        )?;
        let record = tx.query_row(
          &format!("SELECT {SMELTED_COLS} FROM smelted_gold WHERE id = ?1"),
          params![id],
          smelted_from_row,
        )?;
        tx.commit()?;
        Ok(Ok(record))
      })
      .await
      .map_err(write_failure)?
  }

  async fn delete_smelted_gold(&self, id: i64, ctx: ChangeContext) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());
        let copied = snapshot(
          &tx,
          "smelted_gold",
          "smelted_gold_history",
          SMELTED_COLS,
          "id",
          &Value::Integer(id),
          ChangeKind::Deleted,
          &ctx,
          &now,
        )?;
        if copied == 0 {
          return Ok(Err(Error::RecordNotFound {
            entity: "smelted gold",
            key:    id.to_string(),
          }));
        }
        tx.execute("DELETE FROM smelted_gold WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(write_failure)?
  }

  async fn smelted_gold_history(
    &self,
    id: i64,
  ) -> Result<Vec<HistoryEntry<SmeltedGold>>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt =
            conn.prepare(&id_history_sql("smelted_gold_history", SMELTED_COLS))?;
          let rows = stmt
            .query_map(params![id], |r| history_envelope(r, 8, smelted_from_row(r)?))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  // ── Labor metrics ─────────────────────────────────────────────────────

  async fn add_labor_metric(
    &self,
    new: NewLaborMetric,
    ctx: ChangeContext,
  ) -> Result<LaborMetric> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());

        if let Err(e) = check_labor_refs(&tx, &new)? {
          return Ok(Err(e));
        }

        let date = encode_date(new.date);
        if let Err(e) = tx.execute(
          "INSERT INTO labor_metrics
             (date, department_id, shift_id, workers_present, hours_worked,
              overtime_hours, productivity_index, safety_incidents,
              created_at, modified_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          params![
            date,
            new.department_id,
            new.shift_id,
            new.workers_present,
            new.hours_worked,
            new.overtime_hours,
            new.productivity_index,
            new.safety_incidents,
            now,
            now
          ],
        ) {
          if is_constraint_violation(&e) {
            return Ok(Err(Error::DuplicateKey {
              entity: "labor metric",
              key:    format!("{date} (department {})", new.department_id),
            }));
          }
          return Err(e.into());
        }

        let id = tx.last_insert_rowid();
        snapshot(
          &tx,
          "labor_metrics",
          "labor_metrics_history",
          LABOR_COLS,
          "id",
          &Value::Integer(id),
          ChangeKind::Created,
          &ctx,
          &now,
        )?;
        let record = tx.query_row(
          &format!("SELECT {LABOR_COLS} FROM labor_metrics WHERE id = ?1"),
          params![id],
          labor_from_row,
        )?;
        tx.commit()?;
        Ok(Ok(record))
      })
      .await
      .map_err(write_failure)?
  }

  async fn get_labor_metric(&self, id: i64) -> Result<Option<LaborMetric>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!("SELECT {LABOR_COLS} FROM labor_metrics WHERE id = ?1"),
                params![id],
                labor_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_labor_metrics(&self, filter: LaborFilter) -> Result<Vec<LaborMetric>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          range_conditions(&filter.range, "date", &mut conds, &mut binds);
          if let Some(department_id) = filter.department_id {
            binds.push(Value::Integer(department_id));
            conds.push(format!("department_id = ?{}", binds.len()));
          }
          if let Some(shift_id) = filter.shift_id {
            binds.push(Value::Integer(shift_id));
            conds.push(format!("shift_id = ?{}", binds.len()));
          }
          let sql = format!(
            "SELECT {LABOR_COLS} FROM labor_metrics{}
             ORDER BY date DESC, id DESC",
            where_clause(&conds)
          );
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(params_from_iter(binds), labor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn update_labor_metric(
    &self,
    id: i64,
    new: NewLaborMetric,
    ctx: ChangeContext,
  ) -> Result<LaborMetric> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());

        if let Err(e) = check_labor_refs(&tx, &new)? {
          return Ok(Err(e));
        }

        let date = encode_date(new.date);
        let changed = match tx.execute(
          "UPDATE labor_metrics
           SET date = ?2, department_id = ?3, shift_id = ?4,
               workers_present = ?5, hours_worked = ?6, overtime_hours = ?7,
               productivity_index = ?8, safety_incidents = ?9, modified_at = ?10
           WHERE id = ?1",
          params![
            id,
            date,
            new.department_id,
            new.shift_id,
            new.workers_present,
            new.hours_worked,
            new.overtime_hours,
            new.productivity_index,
            new.safety_incidents,
            now
          ],
        ) {
          Ok(n) => n,
          Err(e) if is_constraint_violation(&e) => {
            return Ok(Err(Error::DuplicateKey {
              entity: "labor metric",
              key:    format!("{date} (department {})", new.department_id),
            }));
          }
          Err(e) => return Err(e.into()),
        };
        if changed == 0 {
          return Ok(Err(Error::RecordNotFound {
            entity: "labor metric",
            key:    id.to_string(),
          }));
        }

        snapshot(
          &tx,
          "labor_metrics",
          "labor_metrics_history",
          LABOR_COLS,
          "id",
          &Value::Integer(id),
          ChangeKind::Changed,
          &ctx,
          &now,
        )?;
        let record = tx.query_row(
          &format!("SELECT {LABOR_COLS} FROM labor_metrics WHERE id = ?1"),
          params![id],
          labor_from_row,
        )?;
        tx.commit()?;
        Ok(Ok(record))
      })
      .await
      .map_err(write_failure)?
  }

  async fn delete_labor_metric(&self, id: i64, ctx: ChangeContext) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let now = encode_dt(Utc::now());
        let copied = snapshot(
          &tx,
          "labor_metrics",
          "labor_metrics_history",
          LABOR_COLS,
          "id",
          &Value::Integer(id),
          ChangeKind::Deleted,
          &ctx,
          &now,
        )?;
        if copied == 0 {
          return Ok(Err(Error::RecordNotFound {
            entity: "labor metric",
            key:    id.to_string(),
          }));
        }
        tx.execute("DELETE FROM labor_metrics WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await
      .map_err(write_failure)?
  }

  async fn labor_metric_history(
    &self,
    id: i64,
  ) -> Result<Vec<HistoryEntry<LaborMetric>>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt =
            conn.prepare(&id_history_sql("labor_metrics_history", LABOR_COLS))?;
          let rows = stmt
            .query_map(params![id], |r| history_envelope(r, 11, labor_from_row(r)?))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  // ── Organization ──────────────────────────────────────────────────────

  async fn add_department(&self, new: NewDepartment) -> Result<MiningDepartment> {
    self
      .conn
      .call(move |conn| {
        let now = Utc::now();
        if let Err(e) = conn.execute(
          "INSERT INTO departments (name, created_at) VALUES (?1, ?2)",
          params![new.name, encode_dt(now)],
        ) {
          if is_constraint_violation(&e) {
            return Ok(Err(Error::DuplicateKey {
              entity: "department",
              key:    new.name,
            }));
          }
          return Err(e.into());
        }
        Ok(Ok(MiningDepartment {
          department_id: conn.last_insert_rowid(),
          name:          new.name,
          created_at:    now,
        }))
      })
      .await
      .map_err(write_failure)?
  }

  async fn get_department(&self, id: i64) -> Result<Option<MiningDepartment>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT department_id, name, created_at FROM departments
                 WHERE department_id = ?1",
                params![id],
                |r| {
                  Ok(MiningDepartment {
                    department_id: r.get(0)?,
                    name:          r.get(1)?,
                    created_at:    dt_col(r, 2)?,
                  })
                },
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_departments(&self) -> Result<Vec<MiningDepartment>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT department_id, name, created_at FROM departments
             ORDER BY department_id",
          )?;
          let rows = stmt
            .query_map([], |r| {
              Ok(MiningDepartment {
                department_id: r.get(0)?,
                name:          r.get(1)?,
                created_at:    dt_col(r, 2)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn add_site(&self, new: NewSite) -> Result<MiningSite> {
    self
      .conn
      .call(move |conn| {
        let now = Utc::now();
        if let Err(e) = conn.execute(
          "INSERT INTO sites (name, location, created_at) VALUES (?1, ?2, ?3)",
          params![new.name, new.location, encode_dt(now)],
        ) {
          if is_constraint_violation(&e) {
            return Ok(Err(Error::DuplicateKey { entity: "site", key: new.name }));
          }
          return Err(e.into());
        }
        Ok(Ok(MiningSite {
          site_id:    conn.last_insert_rowid(),
          name:       new.name,
          location:   new.location,
          created_at: now,
        }))
      })
      .await
      .map_err(write_failure)?
  }

  async fn get_site(&self, id: i64) -> Result<Option<MiningSite>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT site_id, name, location, created_at FROM sites
                 WHERE site_id = ?1",
                params![id],
                |r| {
                  Ok(MiningSite {
                    site_id:    r.get(0)?,
                    name:       r.get(1)?,
                    location:   r.get(2)?,
                    created_at: dt_col(r, 3)?,
                  })
                },
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_sites(&self) -> Result<Vec<MiningSite>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT site_id, name, location, created_at FROM sites
             ORDER BY site_id",
          )?;
          let rows = stmt
            .query_map([], |r| {
              Ok(MiningSite {
                site_id:    r.get(0)?,
                name:       r.get(1)?,
                location:   r.get(2)?,
                created_at: dt_col(r, 3)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn get_shift(&self, id: i64) -> Result<Option<Shift>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT shift_id, department_id, name, start_time, end_time,
                        created_at
                 FROM shifts WHERE shift_id = ?1",
                params![id],
                shift_from_row,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn list_shifts(&self, department_id: Option<i64>) -> Result<Vec<Shift>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          if let Some(department_id) = department_id {
            binds.push(Value::Integer(department_id));
            conds.push(format!("department_id = ?{}", binds.len()));
          }
          let sql = format!(
            "SELECT shift_id, department_id, name, start_time, end_time,
                    created_at
             FROM shifts{} ORDER BY department_id, shift_id",
            where_clause(&conds)
          );
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(params_from_iter(binds), shift_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  // ── Reports ───────────────────────────────────────────────────────────

  async fn energy_report(&self, range: DateRange) -> Result<EnergyReport> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          range_conditions(&range, "date", &mut conds, &mut binds);
          let sql = format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(electricity_kwh), 0),
                    COALESCE(SUM(electricity_cost), 0),
                    COALESCE(SUM(diesel_liters), 0),
                    COALESCE(SUM(diesel_cost), 0),
                    COALESCE(SUM(total_cost), 0)
             FROM energy_usage{}",
            where_clause(&conds)
          );
          let report = conn.query_row(&sql, params_from_iter(binds), |r| {
            Ok(EnergyReport {
              days:                   r.get(0)?,
              total_electricity_kwh:  r.get(1)?,
              total_electricity_cost: r.get(2)?,
              total_diesel_liters:    r.get(3)?,
              total_diesel_cost:      r.get(4)?,
              total_cost:             r.get(5)?,
            })
          })?;
          Ok(report)
        })
        .await?,
    )
  }

  async fn gold_production_report(
    &self,
    range: DateRange,
  ) -> Result<GoldProductionReport> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          range_conditions(&range, "date", &mut conds, &mut binds);
          let sql = format!(
            "SELECT COUNT(*),
                    COALESCE(SUM(smelted_gold), 0),
                    COALESCE(SUM(gross_profit), 0),
                    COALESCE(SUM(total_tonnage_milled), 0),
                    COALESCE(AVG(gold_recovery_rate), 0),
                    COALESCE(AVG(operational_efficiency), 0)
             FROM production_logs{}",
            where_clause(&conds)
          );
          let report = conn.query_row(&sql, params_from_iter(binds), |r| {
            Ok(GoldProductionReport {
              days:                       r.get(0)?,
              total_smelted_gold:         r.get(1)?,
              total_gross_profit:         r.get(2)?,
              total_tonnage_milled:       r.get(3)?,
              avg_gold_recovery_rate:     r.get(4)?,
              avg_operational_efficiency: r.get(5)?,
            })
          })?;
          Ok(report)
        })
        .await?,
    )
  }

  async fn labor_report(
    &self,
    range: DateRange,
    department_id: Option<i64>,
  ) -> Result<Vec<DepartmentLaborSummary>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut conds = Vec::new();
          let mut binds = Vec::new();
          range_conditions(&range, "lm.date", &mut conds, &mut binds);
          if let Some(department_id) = department_id {
            binds.push(Value::Integer(department_id));
            conds.push(format!("lm.department_id = ?{}", binds.len()));
          }
          let sql = format!(
            "SELECT lm.department_id, d.name,
                    COALESCE(SUM(lm.workers_present), 0),
                    COALESCE(SUM(lm.hours_worked), 0),
                    COALESCE(SUM(lm.overtime_hours), 0),
                    COALESCE(AVG(lm.productivity_index), 0),
                    COALESCE(SUM(lm.safety_incidents), 0)
             FROM labor_metrics lm
             JOIN departments d ON d.department_id = lm.department_id{}
             GROUP BY lm.department_id, d.name
             ORDER BY lm.department_id",
            where_clause(&conds)
          );
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(params_from_iter(binds), |r| {
              Ok(DepartmentLaborSummary {
                department_id:          r.get(0)?,
                department_name:        r.get(1)?,
                total_workers_present:  r.get(2)?,
                total_hours_worked:     r.get(3)?,
                total_overtime_hours:   r.get(4)?,
                avg_productivity_index: r.get(5)?,
                total_safety_incidents: r.get(6)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }
}

fn shift_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shift> {
  Ok(Shift {
    shift_id:      row.get(0)?,
    department_id: row.get(1)?,
    name:          row.get(2)?,
    start_time:    time_col(row, 3)?,
    end_time:      time_col(row, 4)?,
    created_at:    dt_col(row, 5)?,
  })
}
