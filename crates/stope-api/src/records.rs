//! Handlers for the five date-keyed record collections.
//!
//! All five expose the same surface:
//!
//! | Method   | Path                 | Notes |
//! |----------|----------------------|-------|
//! | `GET`    | `/…[?from=&to=]`     | Newest first |
//! | `POST`   | `/…`                 | 201, 409 on duplicate date |
//! | `GET`    | `/…/:date`           | 404 if absent |
//! | `PUT`    | `/…/:date`           | Full replacement |
//! | `DELETE` | `/…/:date`           | 204; history remains |
//! | `GET`    | `/…/:date/history`   | Latest change first |
//!
//! The per-entity modules are generated by `dated_handlers!`; only the store
//! methods and types differ.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use chrono::NaiveDate;
use stope_core::{
  history::HistoryEntry,
  measurement::{
    EnergyUsage, EnvironmentalMetric, ExplosivesInventory, NewEnergyUsage,
    NewEnvironmentalMetric, NewExplosivesInventory, NewStockpileVolume,
    StockpileVolume,
  },
  production::{DailyProductionLog, NewDailyProductionLog},
  store::{DateRange, OperationsStore},
};

use crate::{
  body::{change_context, parse_payload},
  error::ApiError,
};

macro_rules! dated_handlers {
  ($name:ident, $record:ty, $new:ty,
   $create:ident, $get:ident, $list:ident,
   $update:ident, $delete:ident, $history:ident) => {
    pub mod $name {
      use super::*;

      pub async fn list<S: OperationsStore>(
        State(store): State<Arc<S>>,
        Query(range): Query<DateRange>,
      ) -> Result<Json<Vec<$record>>, ApiError> {
        Ok(Json(store.$list(range).await.map_err(ApiError::from_store)?))
      }

      pub async fn create<S: OperationsStore>(
        State(store): State<Arc<S>>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
      ) -> Result<impl IntoResponse, ApiError> {
        let new: $new = parse_payload(body, <$record>::READ_ONLY_FIELDS)?;
        new.validate().map_err(ApiError::Validation)?;
        let record = store
          .$create(new, change_context(&headers))
          .await
          .map_err(ApiError::from_store)?;
        Ok((StatusCode::CREATED, Json(record)))
      }

      pub async fn get_one<S: OperationsStore>(
        State(store): State<Arc<S>>,
        Path(date): Path<NaiveDate>,
      ) -> Result<Json<$record>, ApiError> {
        let record = store
          .$get(date)
          .await
          .map_err(ApiError::from_store)?
          .ok_or_else(|| ApiError::NotFound(format!("no record for {date}")))?;
        Ok(Json(record))
      }

      /// Full replacement keyed by the path date; the body's `date` field
      /// is ignored.
      pub async fn update<S: OperationsStore>(
        State(store): State<Arc<S>>,
        Path(date): Path<NaiveDate>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
      ) -> Result<Json<$record>, ApiError> {
        let new: $new = parse_payload(body, <$record>::READ_ONLY_FIELDS)?;
        new.validate().map_err(ApiError::Validation)?;
        let record = store
          .$update(date, new, change_context(&headers))
          .await
          .map_err(ApiError::from_store)?;
        Ok(Json(record))
      }

      pub async fn delete_one<S: OperationsStore>(
        State(store): State<Arc<S>>,
        Path(date): Path<NaiveDate>,
        headers: HeaderMap,
      ) -> Result<StatusCode, ApiError> {
        store
          .$delete(date, change_context(&headers))
          .await
          .map_err(ApiError::from_store)?;
        Ok(StatusCode::NO_CONTENT)
      }

      pub async fn history<S: OperationsStore>(
        State(store): State<Arc<S>>,
        Path(date): Path<NaiveDate>,
      ) -> Result<Json<Vec<HistoryEntry<$record>>>, ApiError> {
        Ok(Json(store.$history(date).await.map_err(ApiError::from_store)?))
      }
    }
  };
}

dated_handlers!(
  production,
  DailyProductionLog,
  NewDailyProductionLog,
  create_production_log,
  get_production_log,
  list_production_logs,
  update_production_log,
  delete_production_log,
  production_log_history
);

dated_handlers!(
  explosives,
  ExplosivesInventory,
  NewExplosivesInventory,
  create_explosives_inventory,
  get_explosives_inventory,
  list_explosives_inventory,
  update_explosives_inventory,
  delete_explosives_inventory,
  explosives_inventory_history
);

dated_handlers!(
  stockpiles,
  StockpileVolume,
  NewStockpileVolume,
  create_stockpile_volume,
  get_stockpile_volume,
  list_stockpile_volumes,
  update_stockpile_volume,
  delete_stockpile_volume,
  stockpile_volume_history
);

dated_handlers!(
  environment,
  EnvironmentalMetric,
  NewEnvironmentalMetric,
  create_environmental_metric,
  get_environmental_metric,
  list_environmental_metrics,
  update_environmental_metric,
  delete_environmental_metric,
  environmental_metric_history
);

dated_handlers!(
  energy,
  EnergyUsage,
  NewEnergyUsage,
  create_energy_usage,
  get_energy_usage,
  list_energy_usage,
  update_energy_usage,
  delete_energy_usage,
  energy_usage_history
);
