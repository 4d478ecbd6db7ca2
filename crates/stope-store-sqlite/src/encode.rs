//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Business dates are stored as `YYYY-MM-DD`, shift boundaries as `HH:MM`,
//! and timestamps as fixed-width RFC 3339 with microseconds so that string
//! ordering matches chronological ordering.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use stope_core::history::ChangeKind;

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

/// Read a `YYYY-MM-DD` column at `idx`.
pub fn date_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
  let s: String = row.get(idx)?;
  NaiveDate::parse_from_str(&s, "%Y-%m-%d")
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M").to_string() }

/// Read an `HH:MM` column at `idx`.
pub fn time_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveTime> {
  let s: String = row.get(idx)?;
  NaiveTime::parse_from_str(&s, "%H:%M")
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Fixed-width form so lexicographic column order is chronological order;
/// shadow-row retrieval sorts on this string.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Read an RFC 3339 timestamp column at `idx`.
pub fn dt_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let s: String = row.get(idx)?;
  DateTime::parse_from_rfc3339(&s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── ChangeKind ──────────────────────────────────────────────────────────────

/// Read a `history_change` column at `idx`.
pub fn change_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<ChangeKind> {
  let s: String = row.get(idx)?;
  ChangeKind::parse(&s).ok_or_else(|| {
    rusqlite::Error::FromSqlConversionFailure(
      idx,
      Type::Text,
      format!("unknown change kind: {s:?}").into(),
    )
  })
}
