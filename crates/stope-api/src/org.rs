//! Handlers for the organizational endpoints: departments, sites, shifts.
//!
//! Shifts are generated by the schema migration (three per department) and
//! are read-only here; departments and sites can be created.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use stope_core::{
  org::{MiningDepartment, MiningSite, NewDepartment, NewSite, Shift},
  store::OperationsStore,
};

use crate::error::ApiError;

// ─── Departments ─────────────────────────────────────────────────────────────

/// `GET /departments`
pub async fn list_departments<S: OperationsStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<MiningDepartment>>, ApiError> {
  Ok(Json(store.list_departments().await.map_err(ApiError::from_store)?))
}

/// `POST /departments` — body: `{"name": "Underground"}`
pub async fn create_department<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewDepartment>,
) -> Result<impl IntoResponse, ApiError> {
  let department =
    store.add_department(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(department)))
}

/// `GET /departments/:id`
pub async fn get_department<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<MiningDepartment>, ApiError> {
  let department = store
    .get_department(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("department {id} not found")))?;
  Ok(Json(department))
}

// ─── Sites ───────────────────────────────────────────────────────────────────

/// `GET /sites`
pub async fn list_sites<S: OperationsStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<MiningSite>>, ApiError> {
  Ok(Json(store.list_sites().await.map_err(ApiError::from_store)?))
}

/// `POST /sites`
pub async fn create_site<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewSite>,
) -> Result<impl IntoResponse, ApiError> {
  let site = store.add_site(body).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(site)))
}

/// `GET /sites/:id`
pub async fn get_site<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<MiningSite>, ApiError> {
  let site = store
    .get_site(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("site {id} not found")))?;
  Ok(Json(site))
}

// ─── Shifts ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ShiftParams {
  pub department_id: Option<i64>,
}

/// `GET /shifts[?department_id=]`
pub async fn list_shifts<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ShiftParams>,
) -> Result<Json<Vec<Shift>>, ApiError> {
  Ok(Json(
    store
      .list_shifts(params.department_id)
      .await
      .map_err(ApiError::from_store)?,
  ))
}

/// `GET /shifts/:id`
pub async fn get_shift<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Shift>, ApiError> {
  let shift = store
    .get_shift(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("shift {id} not found")))?;
  Ok(Json(shift))
}
