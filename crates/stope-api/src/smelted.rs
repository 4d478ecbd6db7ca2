//! Handlers for `/smelted-gold` endpoints.
//!
//! Smelted gold batches are id-keyed (one per site per day), so the key in
//! the path is the row id, not the date.

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
  measurement::{NewSmeltedGold, SmeltedGold},
  store::{DateRange, OperationsStore, SmeltedGoldFilter},
};

use crate::{
  body::{change_context, parse_payload},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub from:    Option<NaiveDate>,
  pub to:      Option<NaiveDate>,
  pub site_id: Option<i64>,
}

/// `GET /smelted-gold[?from=&to=&site_id=]`
pub async fn list<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<SmeltedGold>>, ApiError> {
  let filter = SmeltedGoldFilter {
    range:   DateRange { from: params.from, to: params.to },
    site_id: params.site_id,
  };
  Ok(Json(store.list_smelted_gold(filter).await.map_err(ApiError::from_store)?))
}

/// `POST /smelted-gold` — 404 for an unknown site, 409 for a duplicate
/// `(date, site)` pair.
pub async fn create<S: OperationsStore>(
  State(store): State<Arc<S>>,
  headers: HeaderMap,
  Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
  let new: NewSmeltedGold = parse_payload(body, SmeltedGold::READ_ONLY_FIELDS)?;
  new.validate().map_err(ApiError::Validation)?;
  let record = store
    .add_smelted_gold(new, change_context(&headers))
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /smelted-gold/:id`
pub async fn get_one<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SmeltedGold>, ApiError> {
  let record = store
    .get_smelted_gold(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("smelted gold {id} not found")))?;
  Ok(Json(record))
}

/// `PUT /smelted-gold/:id` — full replacement.
pub async fn update<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<SmeltedGold>, ApiError> {
  let new: NewSmeltedGold = parse_payload(body, SmeltedGold::READ_ONLY_FIELDS)?;
  new.validate().map_err(ApiError::Validation)?;
  let record = store
    .update_smelted_gold(id, new, change_context(&headers))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(record))
}

/// `DELETE /smelted-gold/:id`
pub async fn delete_one<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
  store
    .delete_smelted_gold(id, change_context(&headers))
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /smelted-gold/:id/history`
pub async fn history<S: OperationsStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<HistoryEntry<SmeltedGold>>>, ApiError> {
  Ok(Json(store.smelted_gold_history(id).await.map_err(ApiError::from_store)?))
}
