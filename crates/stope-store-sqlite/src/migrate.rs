//! Versioned schema migrations, gated on `PRAGMA user_version`.
//!
//! Each version applies (and, where supported, reverts) inside a single
//! transaction, so a failed migration leaves the database at its previous
//! version.
//!
//! - **v1** — base schema ([`crate::schema::SCHEMA_V1`]). `labor_metrics.shift`
//!   is a nullable enumeration label.
//! - **v2** — the shift enumeration→entity conversion: generates three fixed
//!   shifts per department and repoints labor rows from labels to
//!   `shifts(shift_id)` references.
//!
//! The v2 reverse is an approximation: labels are inferred from shift display
//! names by substring match ([`ShiftLabel::from_shift_name`]), so rows whose
//! shift was NULL or unmatched before the forward run stay NULL, and renamed
//! shifts cannot be mapped back. This loss is accepted, not an error.

use chrono::Utc;
use rusqlite::params;
use stope_core::labor::ShiftLabel;

use crate::{
  Error, Result,
  encode::{encode_dt, encode_time},
  schema::SCHEMA_V1,
};

/// The schema version [`crate::SqliteStore::open`] migrates to.
pub const LATEST_VERSION: i32 = 2;

/// Read the current `user_version`.
pub fn version(conn: &rusqlite::Connection) -> Result<i32> {
  Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
}

/// Apply every migration above the current version, in order.
pub fn upgrade(conn: &mut rusqlite::Connection) -> Result<()> {
  let mut current = version(conn)?;
  while current < LATEST_VERSION {
    current += 1;
    apply(conn, current)?;
    tracing::info!(version = current, "applied schema migration");
  }
  Ok(())
}

/// Apply a single schema version. The version transition and its data
/// transform commit atomically.
pub fn apply(conn: &mut rusqlite::Connection, version: i32) -> Result<()> {
  let tx = conn.transaction()?;
  match version {
    1 => tx.execute_batch(SCHEMA_V1)?,
    2 => convert_shift_labels_up(&tx)?,
    v => return Err(Error::UnknownVersion(v)),
  }
  tx.pragma_update(None, "user_version", version)?;
  tx.commit()?;
  Ok(())
}

/// Revert a single schema version, leaving the database at `version - 1`.
/// Only v2 is revertible; reverting the base schema is not supported.
pub fn revert(conn: &mut rusqlite::Connection, version: i32) -> Result<()> {
  let tx = conn.transaction()?;
  match version {
    2 => convert_shift_labels_down(&tx)?,
    v => return Err(Error::UnknownVersion(v)),
  }
  tx.pragma_update(None, "user_version", version - 1)?;
  tx.commit()?;
  tracing::info!(version, "reverted schema migration");
  Ok(())
}

// ─── v2: shift enumeration → entity ──────────────────────────────────────────

const SHIFTS_DDL: &str = "
CREATE TABLE shifts (
    shift_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    department_id INTEGER NOT NULL REFERENCES departments(department_id),
    name          TEXT NOT NULL,
    start_time    TEXT NOT NULL,
    end_time      TEXT NOT NULL,
    created_at    TEXT NOT NULL
);
";

const LABOR_METRICS_V2_DDL: &str = "
CREATE TABLE labor_metrics_v2 (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    date               TEXT NOT NULL,
    department_id      INTEGER NOT NULL REFERENCES departments(department_id),
    shift_id           INTEGER REFERENCES shifts(shift_id),
    workers_present    INTEGER NOT NULL,
    hours_worked       REAL NOT NULL,
    overtime_hours     REAL NOT NULL,
    productivity_index REAL NOT NULL,
    safety_incidents   INTEGER NOT NULL,
    created_at         TEXT NOT NULL,
    modified_at        TEXT NOT NULL,
    UNIQUE (date, department_id, shift_id)
);
";

const LABOR_METRICS_V1_DDL: &str = "
CREATE TABLE labor_metrics_v1 (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    date               TEXT NOT NULL,
    department_id      INTEGER NOT NULL REFERENCES departments(department_id),
    shift              TEXT,
    workers_present    INTEGER NOT NULL,
    hours_worked       REAL NOT NULL,
    overtime_hours     REAL NOT NULL,
    productivity_index REAL NOT NULL,
    safety_incidents   INTEGER NOT NULL,
    created_at         TEXT NOT NULL,
    modified_at        TEXT NOT NULL,
    UNIQUE (date, department_id, shift)
);
";

/// Forward transform: generate three fixed shifts per department, rebuild
/// `labor_metrics` with a `shift_id` column, and repoint every row whose
/// label matches a generated shift for its department. Rows whose label
/// matches nothing keep a NULL reference — the original label is discarded.
fn convert_shift_labels_up(tx: &rusqlite::Transaction<'_>) -> Result<()> {
  let now = encode_dt(Utc::now());

  tx.execute_batch(SHIFTS_DDL)?;

  let departments: Vec<i64> = tx
    .prepare("SELECT department_id FROM departments ORDER BY department_id")?
    .query_map([], |r| r.get(0))?
    .collect::<rusqlite::Result<_>>()?;

  // (department, label) → generated shift id
  let mut mapping: Vec<(i64, ShiftLabel, i64)> = Vec::new();
  for department_id in departments {
    for label in ShiftLabel::ALL {
      let (start, end) = label.schedule();
      tx.execute(
        "INSERT INTO shifts (department_id, name, start_time, end_time, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
          department_id,
          label.shift_name(),
          encode_time(start),
          encode_time(end),
          now
        ],
      )?;
      mapping.push((department_id, label, tx.last_insert_rowid()));
    }
  }

  // Rebuild the live table: same rows, shift_id initially NULL.
  tx.execute_batch(LABOR_METRICS_V2_DDL)?;
  tx.execute(
    "INSERT INTO labor_metrics_v2
       (id, date, department_id, shift_id, workers_present, hours_worked,
        overtime_hours, productivity_index, safety_incidents, created_at, modified_at)
     SELECT id, date, department_id, NULL, workers_present, hours_worked,
        overtime_hours, productivity_index, safety_incidents, created_at, modified_at
     FROM labor_metrics",
    [],
  )?;

  for (department_id, label, shift_id) in &mapping {
    tx.execute(
      "UPDATE labor_metrics_v2 SET shift_id = ?1
       WHERE id IN (SELECT id FROM labor_metrics
                    WHERE department_id = ?2 AND shift = ?3)",
      params![shift_id, department_id, label.as_str()],
    )?;
  }

  tx.execute_batch(
    "DROP TABLE labor_metrics;
     ALTER TABLE labor_metrics_v2 RENAME TO labor_metrics;",
  )?;

  // The shadow table changes shape but old snapshots are not repointed;
  // pre-migration snapshots lose their shift attribution.
  tx.execute_batch(
    "ALTER TABLE labor_metrics_history DROP COLUMN shift;
     ALTER TABLE labor_metrics_history ADD COLUMN shift_id INTEGER;",
  )?;

  Ok(())
}

/// Reverse transform: rebuild `labor_metrics` with the label column, infer
/// labels from shift display names, then delete all generated shifts.
fn convert_shift_labels_down(tx: &rusqlite::Transaction<'_>) -> Result<()> {
  tx.execute_batch(LABOR_METRICS_V1_DDL)?;
  tx.execute(
    "INSERT INTO labor_metrics_v1
       (id, date, department_id, shift, workers_present, hours_worked,
        overtime_hours, productivity_index, safety_incidents, created_at, modified_at)
     SELECT id, date, department_id, NULL, workers_present, hours_worked,
        overtime_hours, productivity_index, safety_incidents, created_at, modified_at
     FROM labor_metrics",
    [],
  )?;

  let referenced: Vec<(i64, String)> = tx
    .prepare(
      "SELECT lm.id, s.name FROM labor_metrics lm
       JOIN shifts s ON s.shift_id = lm.shift_id",
    )?
    .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
    .collect::<rusqlite::Result<_>>()?;

  for (id, name) in &referenced {
    if let Some(label) = ShiftLabel::from_shift_name(name) {
      tx.execute(
        "UPDATE labor_metrics_v1 SET shift = ?1 WHERE id = ?2",
        params![label.as_str(), id],
      )?;
    }
  }

  tx.execute_batch(
    "DROP TABLE labor_metrics;
     ALTER TABLE labor_metrics_v1 RENAME TO labor_metrics;
     ALTER TABLE labor_metrics_history DROP COLUMN shift_id;
     ALTER TABLE labor_metrics_history ADD COLUMN shift TEXT;
     DROP TABLE shifts;",
  )?;

  Ok(())
}
