//! Organizational grouping entities: departments, sites, and shifts.
//!
//! Shifts are generated by the v2 schema migration (three per department)
//! and are read-only through the API; departments and sites are created
//! directly.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A mining department, e.g. "Underground" or "Processing".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningDepartment {
  pub department_id: i64,
  pub name:          String,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
  pub name: String,
}

/// A physical mining site referenced by smelted gold output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningSite {
  pub site_id:    i64,
  pub name:       String,
  pub location:   Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSite {
  pub name:     String,
  pub location: Option<String>,
}

/// A working shift owned by a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
  pub shift_id:      i64,
  pub department_id: i64,
  pub name:          String,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub created_at:    DateTime<Utc>,
}
