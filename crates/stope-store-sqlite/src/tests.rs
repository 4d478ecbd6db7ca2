use chrono::NaiveDate;
use stope_core::{
  history::{ChangeContext, ChangeKind},
  labor::NewLaborMetric,
  measurement::{NewEnergyUsage, NewSmeltedGold, NewStockpileVolume},
  org::{NewDepartment, NewSite},
  production::NewDailyProductionLog,
  store::{DateRange, LaborFilter, OperationsStore, SmeltedGoldFilter},
};

use crate::{Error, SqliteStore, migrate};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ctx(reason: &str) -> ChangeContext {
  ChangeContext {
    reason: Some(reason.to_owned()),
    user:   Some("tester".to_owned()),
  }
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.unwrap()
}

fn production_log(date: NaiveDate) -> NewDailyProductionLog {
  NewDailyProductionLog {
    date,
    total_tonnage_crushed: 1000.0,
    total_tonnage_hoisted: 1050.0,
    total_tonnage_milled: Some(900.0),
    gold_recovery_rate: 92.5,
    operational_efficiency: 88.0,
    smelted_gold: 1200.0,
    gold_price: 75.0,
    notes: None,
  }
}

fn energy(date: NaiveDate) -> NewEnergyUsage {
  NewEnergyUsage {
    date,
    electricity_kwh: 50_000.0,
    electricity_cost: 7_500.0,
    diesel_liters: 1_000.0,
    diesel_cost: 2_000.0,
  }
}

// ─── Date-keyed CRUD and shadow rows ─────────────────────────────────────────

#[tokio::test]
async fn production_log_roundtrip() {
  let store = store().await;
  let date = d(2024, 11, 15);

  let created = store
    .create_production_log(production_log(date), ctx("initial entry"))
    .await
    .unwrap();
  assert_eq!(created.date, date);
  assert_eq!(created.gross_profit, 1200.0 * 75.0);

  let fetched = store.get_production_log(date).await.unwrap().unwrap();
  assert_eq!(fetched.total_tonnage_crushed, 1000.0);
  assert_eq!(fetched.created_at, fetched.modified_at);
}

#[tokio::test]
async fn duplicate_date_is_a_conflict() {
  let store = store().await;
  let date = d(2024, 11, 15);

  store
    .create_production_log(production_log(date), ctx("first"))
    .await
    .unwrap();
  let err = store
    .create_production_log(production_log(date), ctx("second"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateKey { .. }));

  // The failed write must not have left a shadow row behind.
  let history = store.production_log_history(date).await.unwrap();
  assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn every_mutation_appends_one_shadow_row() {
  let store = store().await;
  let date = d(2024, 11, 15);

  store
    .create_production_log(production_log(date), ctx("created"))
    .await
    .unwrap();

  let mut updated = production_log(date);
  updated.smelted_gold = 1500.0;
  store
    .update_production_log(date, updated, ctx("corrected gold figure"))
    .await
    .unwrap();

  store.delete_production_log(date, ctx("duplicate day")).await.unwrap();
  assert!(store.get_production_log(date).await.unwrap().is_none());

  // History survives deletion, latest change first.
  let history = store.production_log_history(date).await.unwrap();
  assert_eq!(history.len(), 3);
  assert_eq!(history[0].change, ChangeKind::Deleted);
  assert_eq!(history[1].change, ChangeKind::Changed);
  assert_eq!(history[2].change, ChangeKind::Created);

  assert_eq!(history[0].reason.as_deref(), Some("duplicate day"));
  assert_eq!(history[0].user.as_deref(), Some("tester"));
  // The deletion snapshot holds the final field values.
  assert_eq!(history[0].record.smelted_gold, 1500.0);
  assert_eq!(history[2].record.smelted_gold, 1200.0);
}

#[tokio::test]
async fn missing_rows_reject_without_shadow_rows() {
  let store = store().await;
  let date = d(2024, 11, 15);

  let err = store
    .update_production_log(date, production_log(date), ctx("no such row"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RecordNotFound { .. }));

  let err = store
    .delete_production_log(date, ctx("no such row"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RecordNotFound { .. }));

  assert!(store.production_log_history(date).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_respects_date_range() {
  let store = store().await;
  for day in [10, 12, 14] {
    store
      .create_production_log(production_log(d(2024, 11, day)), ctx("seed"))
      .await
      .unwrap();
  }

  let all = store.list_production_logs(DateRange::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  // Newest first.
  assert_eq!(all[0].date, d(2024, 11, 14));

  let bounded = store
    .list_production_logs(DateRange {
      from: Some(d(2024, 11, 11)),
      to:   Some(d(2024, 11, 13)),
    })
    .await
    .unwrap();
  assert_eq!(bounded.len(), 1);
  assert_eq!(bounded[0].date, d(2024, 11, 12));
}

#[tokio::test]
async fn energy_total_cost_is_server_computed() {
  let store = store().await;
  let row = store
    .create_energy_usage(energy(d(2024, 11, 15)), ctx("seed"))
    .await
    .unwrap();
  assert_eq!(row.total_cost, 9_500.0);
}

#[tokio::test]
async fn stockpile_update_replaces_whole_record() {
  let store = store().await;
  let date = d(2024, 11, 15);
  store
    .create_stockpile_volume(
      NewStockpileVolume {
        date,
        ore_tons: 5_000.0,
        waste_tons: 12_000.0,
        grade_gpt: 2.4,
        location: "North pad".to_owned(),
      },
      ctx("survey"),
    )
    .await
    .unwrap();

  let replaced = store
    .update_stockpile_volume(
      date,
      NewStockpileVolume {
        date,
        ore_tons: 5_100.0,
        waste_tons: 12_000.0,
        grade_gpt: 2.4,
        location: "North pad".to_owned(),
      },
      ctx("resurvey"),
    )
    .await
    .unwrap();
  assert_eq!(replaced.ore_tons, 5_100.0);
  assert!(replaced.modified_at >= replaced.created_at);
}

// ─── Smelted gold ────────────────────────────────────────────────────────────

#[tokio::test]
async fn smelted_gold_requires_known_site() {
  let store = store().await;
  let err = store
    .add_smelted_gold(
      NewSmeltedGold {
        date:              d(2024, 11, 15),
        site_id:           42,
        total_weight:      250.0,
        purity_percentage: 91.0,
        notes:             None,
      },
      ctx("pour"),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::SiteNotFound(42)));
}

#[tokio::test]
async fn smelted_gold_unique_per_date_and_site() {
  let store = store().await;
  let site = store
    .add_site(NewSite { name: "Main pit".to_owned(), location: None })
    .await
    .unwrap();

  let pour = NewSmeltedGold {
    date:              d(2024, 11, 15),
    site_id:           site.site_id,
    total_weight:      250.0,
    purity_percentage: 91.0,
    notes:             None,
  };
  let first = store.add_smelted_gold(pour.clone(), ctx("pour")).await.unwrap();
  let err = store.add_smelted_gold(pour, ctx("again")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateKey { .. }));

  // A second site on the same day is fine.
  let other = store
    .add_site(NewSite { name: "East pit".to_owned(), location: None })
    .await
    .unwrap();
  store
    .add_smelted_gold(
      NewSmeltedGold {
        date:              d(2024, 11, 15),
        site_id:           other.site_id,
        total_weight:      90.0,
        purity_percentage: 88.0,
        notes:             None,
      },
      ctx("pour"),
    )
    .await
    .unwrap();

  let by_site = store
    .list_smelted_gold(SmeltedGoldFilter {
      range:   DateRange::default(),
      site_id: Some(site.site_id),
    })
    .await
    .unwrap();
  assert_eq!(by_site.len(), 1);
  assert_eq!(by_site[0].id, first.id);
}

#[tokio::test]
async fn smelted_gold_history_survives_deletion() {
  let store = store().await;
  let site = store
    .add_site(NewSite { name: "Main pit".to_owned(), location: None })
    .await
    .unwrap();
  let row = store
    .add_smelted_gold(
      NewSmeltedGold {
        date:              d(2024, 11, 15),
        site_id:           site.site_id,
        total_weight:      250.0,
        purity_percentage: 91.0,
        notes:             Some("first pour".to_owned()),
      },
      ctx("pour"),
    )
    .await
    .unwrap();
  store.delete_smelted_gold(row.id, ctx("mislogged")).await.unwrap();

  assert!(store.get_smelted_gold(row.id).await.unwrap().is_none());
  let history = store.smelted_gold_history(row.id).await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].change, ChangeKind::Deleted);
  assert_eq!(history[0].record.total_weight, 250.0);
}

// ─── Labor metrics ───────────────────────────────────────────────────────────

#[tokio::test]
async fn labor_metric_requires_known_references() {
  let store = store().await;
  let metric = NewLaborMetric {
    date:               d(2024, 11, 15),
    department_id:      7,
    shift_id:           None,
    workers_present:    40,
    hours_worked:       8.0,
    overtime_hours:     0.0,
    productivity_index: 0.9,
    safety_incidents:   0,
  };
  let err = store.add_labor_metric(metric.clone(), ctx("shift report")).await.unwrap_err();
  assert!(matches!(err, Error::DepartmentNotFound(7)));

  let dept = store
    .add_department(NewDepartment { name: "Underground".to_owned() })
    .await
    .unwrap();
  let err = store
    .add_labor_metric(
      NewLaborMetric {
        department_id: dept.department_id,
        shift_id: Some(999),
        ..metric
      },
      ctx("shift report"),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ShiftNotFound(999)));
}

#[tokio::test]
async fn labor_metrics_filter_by_department_and_shift() {
  let store = store().await;
  let dept = store
    .add_department(NewDepartment { name: "Underground".to_owned() })
    .await
    .unwrap();
  // Departments created after the migration get no generated shifts.
  let shifts = store.list_shifts(Some(dept.department_id)).await.unwrap();
  assert!(shifts.is_empty());

  let metric = |shift_id| NewLaborMetric {
    date:               d(2024, 11, 15),
    department_id:      dept.department_id,
    shift_id,
    workers_present:    40,
    hours_worked:       8.0,
    overtime_hours:     0.0,
    productivity_index: 0.9,
    safety_incidents:   0,
  };
  store.add_labor_metric(metric(None), ctx("report")).await.unwrap();

  let listed = store
    .list_labor_metrics(LaborFilter {
      range:         DateRange::default(),
      department_id: Some(dept.department_id),
      shift_id:      None,
    })
    .await
    .unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].shift_id, None);
}

// ─── Shift migration ─────────────────────────────────────────────────────────

/// A database at schema v1 with two departments and labeled labor rows,
/// as a deployment would look before the shift conversion.
async fn v1_labor_fixture() -> SqliteStore {
  let conn = tokio_rusqlite::Connection::open_in_memory().await.unwrap();
  conn
    .call(|conn| {
      conn.execute_batch("PRAGMA foreign_keys = ON;")?;
      migrate::apply(conn, 1).unwrap();
      conn.execute_batch(
        "INSERT INTO departments (name, created_at)
           VALUES ('Underground', '2024-01-01T00:00:00.000000Z'),
                  ('Processing',  '2024-01-01T00:00:00.000000Z');
         INSERT INTO labor_metrics
           (date, department_id, shift, workers_present, hours_worked,
            overtime_hours, productivity_index, safety_incidents,
            created_at, modified_at)
           VALUES
             ('2024-11-15', 1, 'MORNING', 40, 8.0, 1.0, 0.9, 0,
              '2024-11-15T06:00:00.000000Z', '2024-11-15T06:00:00.000000Z'),
             ('2024-11-15', 2, 'NIGHT', 25, 8.0, 0.0, 0.8, 1,
              '2024-11-15T22:00:00.000000Z', '2024-11-15T22:00:00.000000Z'),
             ('2024-11-16', 1, NULL, 38, 8.0, 0.0, 0.85, 0,
              '2024-11-16T06:00:00.000000Z', '2024-11-16T06:00:00.000000Z');",
      )?;
      Ok(())
    })
    .await
    .unwrap();
  SqliteStore { conn }
}

async fn upgrade(store: &SqliteStore) {
  store
    .conn
    .call(|conn| {
      migrate::upgrade(conn).unwrap();
      Ok(())
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn migration_generates_three_shifts_per_department() {
  let store = v1_labor_fixture().await;
  upgrade(&store).await;

  let shifts = store.list_shifts(None).await.unwrap();
  assert_eq!(shifts.len(), 6);
  for department_id in [1, 2] {
    let per_dept = store.list_shifts(Some(department_id)).await.unwrap();
    let names: Vec<_> = per_dept.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Morning Shift", "Afternoon Shift", "Night Shift"]);
  }

  let morning = &store.list_shifts(Some(1)).await.unwrap()[0];
  assert_eq!(morning.start_time.to_string(), "06:00:00");
  assert_eq!(morning.end_time.to_string(), "14:00:00");
}

#[tokio::test]
async fn migration_repoints_labeled_rows_and_leaves_null_alone() {
  let store = v1_labor_fixture().await;
  upgrade(&store).await;

  let metrics = store
    .list_labor_metrics(LaborFilter::default())
    .await
    .unwrap();
  assert_eq!(metrics.len(), 3);

  let morning = metrics.iter().find(|m| m.id == 1).unwrap();
  let shift = store.get_shift(morning.shift_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(shift.name, "Morning Shift");
  assert_eq!(shift.department_id, 1);

  let night = metrics.iter().find(|m| m.id == 2).unwrap();
  let shift = store.get_shift(night.shift_id.unwrap()).await.unwrap().unwrap();
  assert_eq!(shift.name, "Night Shift");
  assert_eq!(shift.department_id, 2);

  let unlabeled = metrics.iter().find(|m| m.id == 3).unwrap();
  assert_eq!(unlabeled.shift_id, None);
}

#[tokio::test]
async fn migration_reverse_restores_labels() {
  let store = v1_labor_fixture().await;
  upgrade(&store).await;

  let labels: Vec<Option<String>> = store
    .conn
    .call(|conn| {
      migrate::revert(conn, 2).unwrap();
      assert_eq!(migrate::version(conn).unwrap(), 1);
      let mut stmt =
        conn.prepare("SELECT shift FROM labor_metrics ORDER BY id")?;
      let rows = stmt
        .query_map([], |r| r.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await
    .unwrap();

  assert_eq!(
    labels,
    [Some("MORNING".to_owned()), Some("NIGHT".to_owned()), None]
  );

  // The shifts table is gone again.
  let shifts_left: i64 = store
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'shifts'",
        [],
        |r| r.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(shifts_left, 0);
}

#[tokio::test]
async fn unknown_schema_version_is_rejected() {
  let err = tokio_rusqlite::Connection::open_in_memory()
    .await
    .unwrap()
    .call(|conn| Ok(migrate::apply(conn, 99)))
    .await
    .unwrap()
    .unwrap_err();
  assert!(matches!(err, Error::UnknownVersion(99)));
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn energy_report_sums_over_range() {
  let store = store().await;
  store.create_energy_usage(energy(d(2024, 11, 14)), ctx("seed")).await.unwrap();
  store.create_energy_usage(energy(d(2024, 11, 15)), ctx("seed")).await.unwrap();
  store.create_energy_usage(energy(d(2024, 12, 1)), ctx("seed")).await.unwrap();

  let report = store
    .energy_report(DateRange {
      from: Some(d(2024, 11, 1)),
      to:   Some(d(2024, 11, 30)),
    })
    .await
    .unwrap();
  assert_eq!(report.days, 2);
  assert_eq!(report.total_electricity_kwh, 100_000.0);
  assert_eq!(report.total_cost, 19_000.0);

  let empty = store
    .energy_report(DateRange { from: Some(d(2025, 1, 1)), to: None })
    .await
    .unwrap();
  assert_eq!(empty.days, 0);
  assert_eq!(empty.total_cost, 0.0);
}

#[tokio::test]
async fn gold_production_report_averages_rates() {
  let store = store().await;
  let mut a = production_log(d(2024, 11, 14));
  a.gold_recovery_rate = 90.0;
  let mut b = production_log(d(2024, 11, 15));
  b.gold_recovery_rate = 94.0;
  store.create_production_log(a, ctx("seed")).await.unwrap();
  store.create_production_log(b, ctx("seed")).await.unwrap();

  let report = store.gold_production_report(DateRange::default()).await.unwrap();
  assert_eq!(report.days, 2);
  assert_eq!(report.total_smelted_gold, 2400.0);
  assert_eq!(report.total_gross_profit, 2.0 * 1200.0 * 75.0);
  assert_eq!(report.avg_gold_recovery_rate, 92.0);
}

#[tokio::test]
async fn labor_report_groups_by_department() {
  let store = store().await;
  let a = store
    .add_department(NewDepartment { name: "Underground".to_owned() })
    .await
    .unwrap();
  let b = store
    .add_department(NewDepartment { name: "Processing".to_owned() })
    .await
    .unwrap();

  let metric = |date, department_id, workers| NewLaborMetric {
    date,
    department_id,
    shift_id: None,
    workers_present: workers,
    hours_worked: 8.0,
    overtime_hours: 1.0,
    productivity_index: 0.9,
    safety_incidents: 0,
  };
  store
    .add_labor_metric(metric(d(2024, 11, 14), a.department_id, 40), ctx("seed"))
    .await
    .unwrap();
  store
    .add_labor_metric(metric(d(2024, 11, 15), a.department_id, 42), ctx("seed"))
    .await
    .unwrap();
  store
    .add_labor_metric(metric(d(2024, 11, 15), b.department_id, 25), ctx("seed"))
    .await
    .unwrap();

  let rows = store.labor_report(DateRange::default(), None).await.unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0].department_name, "Underground");
  assert_eq!(rows[0].total_workers_present, 82);
  assert_eq!(rows[0].total_hours_worked, 16.0);
  assert_eq!(rows[1].total_workers_present, 25);

  let only_b = store
    .labor_report(DateRange::default(), Some(b.department_id))
    .await
    .unwrap();
  assert_eq!(only_b.len(), 1);
  assert_eq!(only_b[0].department_id, b.department_id);
}
