//! JSON REST API for the stope mine-operations backend.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stope_core::store::OperationsStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! Write endpoints accept the optional `X-Change-Reason` and `X-Change-User`
//! headers; both are copied verbatim onto the shadow row for the mutation.

pub mod body;
pub mod error;
pub mod labor;
pub mod org;
pub mod records;
pub mod reports;
pub mod smelted;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use serde::Deserialize;
use stope_core::store::OperationsStore;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `STOPE_*` environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: OperationsStore + 'static,
{
  use self::labor as lm;
  use self::records::{energy, environment, explosives, production, stockpiles};

  Router::new()
    // Daily production logs
    .route("/production-logs",
      get(production::list::<S>).post(production::create::<S>))
    .route("/production-logs/{date}",
      get(production::get_one::<S>)
        .put(production::update::<S>)
        .delete(production::delete_one::<S>))
    .route("/production-logs/{date}/history", get(production::history::<S>))
    // Explosives inventory
    .route("/explosives-inventory",
      get(explosives::list::<S>).post(explosives::create::<S>))
    .route("/explosives-inventory/{date}",
      get(explosives::get_one::<S>)
        .put(explosives::update::<S>)
        .delete(explosives::delete_one::<S>))
    .route("/explosives-inventory/{date}/history", get(explosives::history::<S>))
    // Stockpile volumes
    .route("/stockpile-volumes",
      get(stockpiles::list::<S>).post(stockpiles::create::<S>))
    .route("/stockpile-volumes/{date}",
      get(stockpiles::get_one::<S>)
        .put(stockpiles::update::<S>)
        .delete(stockpiles::delete_one::<S>))
    .route("/stockpile-volumes/{date}/history", get(stockpiles::history::<S>))
    // Environmental metrics
    .route("/environmental-metrics",
      get(environment::list::<S>).post(environment::create::<S>))
    .route("/environmental-metrics/{date}",
      get(environment::get_one::<S>)
        .put(environment::update::<S>)
        .delete(environment::delete_one::<S>))
    .route("/environmental-metrics/{date}/history", get(environment::history::<S>))
    // Energy usage
    .route("/energy-usage",
      get(energy::list::<S>).post(energy::create::<S>))
    .route("/energy-usage/{date}",
      get(energy::get_one::<S>)
        .put(energy::update::<S>)
        .delete(energy::delete_one::<S>))
    .route("/energy-usage/{date}/history", get(energy::history::<S>))
    // Smelted gold
    .route("/smelted-gold", get(smelted::list::<S>).post(smelted::create::<S>))
    .route("/smelted-gold/{id}",
      get(smelted::get_one::<S>)
        .put(smelted::update::<S>)
        .delete(smelted::delete_one::<S>))
    .route("/smelted-gold/{id}/history", get(smelted::history::<S>))
    // Labor metrics
    .route("/labor-metrics", get(lm::list::<S>).post(lm::create::<S>))
    .route("/labor-metrics/{id}",
      get(lm::get_one::<S>).put(lm::update::<S>).delete(lm::delete_one::<S>))
    .route("/labor-metrics/{id}/history", get(lm::history::<S>))
    // Organization
    .route("/departments",
      get(org::list_departments::<S>).post(org::create_department::<S>))
    .route("/departments/{id}", get(org::get_department::<S>))
    .route("/sites", get(org::list_sites::<S>).post(org::create_site::<S>))
    .route("/sites/{id}", get(org::get_site::<S>))
    .route("/shifts", get(org::list_shifts::<S>))
    .route("/shifts/{id}", get(org::get_shift::<S>))
    // Reports
    .route("/reports/energy", get(reports::energy::<S>))
    .route("/reports/gold-production", get(reports::gold_production::<S>))
    .route("/reports/labor", get(reports::labor::<S>))
    .with_state(store)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
  };
  use serde_json::{Value, json};
  use stope_store_sqlite::SqliteStore;
  use tower::ServiceExt;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
      builder = builder.header(*name, *value);
    }
    let request = match body {
      Some(v) => builder
        .header("content-type", "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn production_body() -> Value {
    json!({
      "date": "2024-11-15",
      "total_tonnage_crushed": 1000.0,
      "total_tonnage_hoisted": 1050.0,
      "total_tonnage_milled": 900.0,
      "gold_recovery_rate": 92.5,
      "operational_efficiency": 88.0,
      "smelted_gold": 1200.0,
      "gold_price": 75.0,
    })
  }

  #[tokio::test]
  async fn create_computes_gross_profit() {
    let app = app().await;
    let (status, body) = send(
      &app,
      Method::POST,
      "/production-logs",
      &[],
      Some(production_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["gross_profit"], json!(90000.0));
    assert!(body["created_at"].is_string());
  }

  #[tokio::test]
  async fn invalid_payload_is_rejected_and_nothing_is_stored() {
    let app = app().await;
    let mut body = production_body();
    body["total_tonnage_milled"] = json!(1100.0);
    let (status, response) =
      send(&app, Method::POST, "/production-logs", &[], Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
      response["errors"]["total_tonnage_milled"][0],
      "Milled tonnage cannot exceed crushed tonnage."
    );

    let (status, _) =
      send(&app, Method::GET, "/production-logs/2024-11-15", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn read_only_fields_are_rejected() {
    let app = app().await;
    let mut body = production_body();
    body["gross_profit"] = json!(1.0);
    let (status, response) =
      send(&app, Method::POST, "/production-logs", &[], Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["errors"]["gross_profit"][0], "Gross profit is read-only.");
  }

  #[tokio::test]
  async fn duplicate_date_is_a_conflict() {
    let app = app().await;
    let (status, _) =
      send(&app, Method::POST, "/production-logs", &[], Some(production_body()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) =
      send(&app, Method::POST, "/production-logs", &[], Some(production_body()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn change_headers_land_on_the_shadow_row() {
    let app = app().await;
    send(&app, Method::POST, "/production-logs", &[], Some(production_body()))
      .await;

    let mut update = production_body();
    update["smelted_gold"] = json!(1500.0);
    let (status, _) = send(
      &app,
      Method::PUT,
      "/production-logs/2024-11-15",
      &[("x-change-reason", "corrected gold figure"), ("x-change-user", "jsmith")],
      Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
      &app,
      Method::DELETE,
      "/production-logs/2024-11-15",
      &[("x-change-reason", "duplicate day")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
      send(&app, Method::GET, "/production-logs/2024-11-15", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // History survives deletion, latest change first.
    let (status, history) = send(
      &app,
      Method::GET,
      "/production-logs/2024-11-15/history",
      &[],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["change"], "deleted");
    assert_eq!(entries[0]["reason"], "duplicate day");
    assert_eq!(entries[1]["change"], "changed");
    assert_eq!(entries[1]["user"], "jsmith");
    assert_eq!(entries[1]["record"]["smelted_gold"], json!(1500.0));
    assert_eq!(entries[2]["change"], "created");
    assert_eq!(entries[2]["reason"], Value::Null);
  }

  #[tokio::test]
  async fn smelted_gold_validation_reports_each_field() {
    let app = app().await;
    let (status, site) = send(
      &app,
      Method::POST,
      "/sites",
      &[],
      Some(json!({ "name": "Main pit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = send(
      &app,
      Method::POST,
      "/smelted-gold",
      &[],
      Some(json!({
        "date": "2024-11-15",
        "site_id": site["site_id"],
        "total_weight": -1.0,
        "purity_percentage": 105.0,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
      response["errors"]["purity_percentage"][0],
      "Purity percentage must be between 0 and 100."
    );
    assert_eq!(
      response["errors"]["total_weight"][0],
      "Total weight cannot be negative."
    );
  }

  #[tokio::test]
  async fn smelted_gold_unknown_site_is_not_found() {
    let app = app().await;
    let (status, _) = send(
      &app,
      Method::POST,
      "/smelted-gold",
      &[],
      Some(json!({
        "date": "2024-11-15",
        "site_id": 42,
        "total_weight": 250.0,
        "purity_percentage": 91.0,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn labor_metric_unknown_department_is_not_found() {
    let app = app().await;
    let (status, _) = send(
      &app,
      Method::POST,
      "/labor-metrics",
      &[],
      Some(json!({
        "date": "2024-11-15",
        "department_id": 7,
        "workers_present": 40,
        "hours_worked": 8.0,
        "productivity_index": 0.9,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn energy_report_over_seeded_days() {
    let app = app().await;
    for date in ["2024-11-14", "2024-11-15"] {
      let (status, _) = send(
        &app,
        Method::POST,
        "/energy-usage",
        &[],
        Some(json!({
          "date": date,
          "electricity_kwh": 50000.0,
          "electricity_cost": 7500.0,
          "diesel_liters": 1000.0,
          "diesel_cost": 2000.0,
        })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = send(
      &app,
      Method::GET,
      "/reports/energy?from=2024-11-01&to=2024-11-30",
      &[],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["days"], 2);
    assert_eq!(report["total_cost"], json!(19000.0));
  }

  #[tokio::test]
  async fn departments_roundtrip() {
    let app = app().await;
    let (status, dept) = send(
      &app,
      Method::POST,
      "/departments",
      &[],
      Some(json!({ "name": "Underground" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(
      &app,
      Method::GET,
      &format!("/departments/{}", dept["department_id"]),
      &[],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Underground");

    let (status, _) = send(
      &app,
      Method::POST,
      "/departments",
      &[],
      Some(json!({ "name": "Underground" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn shifts_are_empty_on_a_fresh_database() {
    // A fresh database migrates past v2 with no departments, so no shifts
    // get generated; the endpoint still answers.
    let app = app().await;
    let (status, shifts) = send(&app, Method::GET, "/shifts", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shifts, json!([]));

    let (status, _) = send(&app, Method::GET, "/shifts/1", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
