//! Handlers for `/labor-metrics` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use stope_core::{
  history::HistoryEntry,
  labor::{LaborMetric, NewLaborMetric},
  store::{DateRange, LaborFilter, OperationsStore},
};

use crate::{
  body::{change_context, parse_payload},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub from:          Option<NaiveDate>,
  pub to:            Option<NaiveDate>,
  pub department_id: Option<i64>,
  pub shift_id:      Option<i64>,
}

/// `GET /labor-metrics[?from=&to=&department_id=&shift_id=]`
pub async fn list<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<LaborMetric>>, ApiError> {
  let filter = LaborFilter {
    range:         DateRange { from: params.from, to: params.to },
    department_id: params.department_id,
    shift_id:      params.shift_id,
  };
  Ok(Json(store.list_labor_metrics(filter).await.map_err(ApiError::from_store)?))
}

/// `POST /labor-metrics` — 404 for an unknown department or shift.
pub async fn create<S: OperationsStore>(
  State(store): State<Arc<S>>,
  headers: HeaderMap,
  Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
  let new: NewLaborMetric = parse_payload(body, LaborMetric::READ_ONLY_FIELDS)?;
  new.validate().map_err(ApiError::Validation)?;
  let record = store
    .add_labor_metric(new, change_context(&headers))
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /labor-metrics/:id`
pub async fn get_one<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<LaborMetric>, ApiError> {
  let record = store
    .get_labor_metric(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("labor metric {id} not found")))?;
  Ok(Json(record))
}

/// `PUT /labor-metrics/:id` — full replacement.
pub async fn update<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<LaborMetric>, ApiError> {
  let new: NewLaborMetric = parse_payload(body, LaborMetric::READ_ONLY_FIELDS)?;
  new.validate().map_err(ApiError::Validation)?;
  let record = store
    .update_labor_metric(id, new, change_context(&headers))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}

/// `DELETE /labor-metrics/:id`
pub async fn delete_one<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
  store
    .delete_labor_metric(id, change_context(&headers))
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /labor-metrics/:id/history`
pub async fn history<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<HistoryEntry<LaborMetric>>>, ApiError> {
  Ok(Json(store.labor_metric_history(id).await.map_err(ApiError::from_store)?))
}
