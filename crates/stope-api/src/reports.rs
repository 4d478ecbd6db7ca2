//! Handlers for `/reports/*` — read-only aggregates, never shadow-tracked.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use stope_core::{
  report::{DepartmentLaborSummary, EnergyReport, GoldProductionReport},
  store::{DateRange, OperationsStore},
};

use crate::error::ApiError;

/// `GET /reports/energy[?from=&to=]`
pub async fn energy<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Query(range): Query<DateRange>,
) -> Result<Json<EnergyReport>, ApiError> {
  Ok(Json(store.energy_report(range).await.map_err(ApiError::from_store)?))
}

/// `GET /reports/gold-production[?from=&to=]`
pub async fn gold_production<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Query(range): Query<DateRange>,
) -> Result<Json<GoldProductionReport>, ApiError> {
  Ok(Json(
    store
      .gold_production_report(range)
      .await
      .map_err(ApiError::from_store)?,
  ))
}

#[derive(Debug, Deserialize)]
pub struct LaborParams {
  pub from:          Option<NaiveDate>,
  pub to:            Option<NaiveDate>,
  pub department_id: Option<i64>,
}

/// `GET /reports/labor[?from=&to=&department_id=]`
pub async fn labor<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<LaborParams>,
) -> Result<Json<Vec<DepartmentLaborSummary>>, ApiError> {
  let range = DateRange { from: params.from, to: params.to };
  Ok(Json(
    store
      .labor_report(range, params.department_id)
      .await
      .map_err(ApiError::from_store)?,
  ))
}
