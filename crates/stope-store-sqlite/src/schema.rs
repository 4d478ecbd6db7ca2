//! Base (v1) SQL schema for the stope SQLite store.
//!
//! Applied inside a transaction by `migrate::apply`; later versions are
//! expressed as migrations gated on `PRAGMA user_version` (see `migrate`).
//!
//! Every tracked entity has a `<table>_history` shadow table mirroring its
//! live columns plus the change envelope. Shadow tables are strictly
//! append-only: no UPDATE or DELETE is ever issued against them, and they
//! intentionally carry no foreign keys so history survives deletion of the
//! live row (or its referents).

pub const SCHEMA_V1: &str = "
CREATE TABLE departments (
    department_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL UNIQUE,
    created_at    TEXT NOT NULL
);

CREATE TABLE sites (
    site_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    location   TEXT,
    created_at TEXT NOT NULL
);

-- One row per calendar day; the date is the natural key.
CREATE TABLE production_logs (
    date                   TEXT PRIMARY KEY,
    total_tonnage_crushed  REAL NOT NULL,
    total_tonnage_hoisted  REAL NOT NULL,
    total_tonnage_milled   REAL NOT NULL DEFAULT 0,
    gold_recovery_rate     REAL NOT NULL DEFAULT 0,
    operational_efficiency REAL NOT NULL DEFAULT 0,
    smelted_gold           REAL NOT NULL DEFAULT 0,
    gold_price             REAL NOT NULL DEFAULT 0,
    gross_profit           REAL NOT NULL DEFAULT 0,  -- always smelted_gold * gold_price
    notes                  TEXT,
    created_at             TEXT NOT NULL,
    modified_at            TEXT NOT NULL
);

CREATE TABLE production_logs_history (
    history_id             INTEGER PRIMARY KEY AUTOINCREMENT,
    date                   TEXT NOT NULL,
    total_tonnage_crushed  REAL NOT NULL,
    total_tonnage_hoisted  REAL NOT NULL,
    total_tonnage_milled   REAL NOT NULL,
    gold_recovery_rate     REAL NOT NULL,
    operational_efficiency REAL NOT NULL,
    smelted_gold           REAL NOT NULL,
    gold_price             REAL NOT NULL,
    gross_profit           REAL NOT NULL,
    notes                  TEXT,
    created_at             TEXT NOT NULL,
    modified_at            TEXT NOT NULL,
    history_at             TEXT NOT NULL,
    history_change         TEXT NOT NULL,   -- 'created' | 'changed' | 'deleted'
    history_reason         TEXT,
    history_user           TEXT
);
CREATE INDEX production_logs_history_date_idx ON production_logs_history(date);

CREATE TABLE explosives_inventory (
    date             TEXT PRIMARY KEY,
    anfo_kg          REAL NOT NULL,
    emulsion_kg      REAL NOT NULL,
    detonators_count INTEGER NOT NULL,
    boosters_count   INTEGER NOT NULL,
    total_value      REAL NOT NULL,
    created_at       TEXT NOT NULL,
    modified_at      TEXT NOT NULL
);

CREATE TABLE explosives_inventory_history (
    history_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    date             TEXT NOT NULL,
    anfo_kg          REAL NOT NULL,
    emulsion_kg      REAL NOT NULL,
    detonators_count INTEGER NOT NULL,
    boosters_count   INTEGER NOT NULL,
    total_value      REAL NOT NULL,
    created_at       TEXT NOT NULL,
    modified_at      TEXT NOT NULL,
    history_at       TEXT NOT NULL,
    history_change   TEXT NOT NULL,
    history_reason   TEXT,
    history_user     TEXT
);
CREATE INDEX explosives_inventory_history_date_idx ON explosives_inventory_history(date);

CREATE TABLE stockpile_volumes (
    date        TEXT PRIMARY KEY,
    ore_tons    REAL NOT NULL,
    waste_tons  REAL NOT NULL,
    grade_gpt   REAL NOT NULL,
    location    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    modified_at TEXT NOT NULL
);

CREATE TABLE stockpile_volumes_history (
    history_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    date           TEXT NOT NULL,
    ore_tons       REAL NOT NULL,
    waste_tons     REAL NOT NULL,
    grade_gpt      REAL NOT NULL,
    location       TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    modified_at    TEXT NOT NULL,
    history_at     TEXT NOT NULL,
    history_change TEXT NOT NULL,
    history_reason TEXT,
    history_user   TEXT
);
CREATE INDEX stockpile_volumes_history_date_idx ON stockpile_volumes_history(date);

CREATE TABLE environmental_metrics (
    date                   TEXT PRIMARY KEY,
    dust_level_pm10        REAL NOT NULL,
    noise_level_db         REAL NOT NULL,
    water_usage_m3         REAL NOT NULL,
    rehabilitation_area_m2 REAL NOT NULL,
    waste_water_ph         REAL NOT NULL,
    carbon_emissions       REAL NOT NULL,
    waste_generated        REAL NOT NULL,
    additional_notes       TEXT,
    created_at             TEXT NOT NULL,
    modified_at            TEXT NOT NULL
);

CREATE TABLE environmental_metrics_history (
    history_id             INTEGER PRIMARY KEY AUTOINCREMENT,
    date                   TEXT NOT NULL,
    dust_level_pm10        REAL NOT NULL,
    noise_level_db         REAL NOT NULL,
    water_usage_m3         REAL NOT NULL,
    rehabilitation_area_m2 REAL NOT NULL,
    waste_water_ph         REAL NOT NULL,
    carbon_emissions       REAL NOT NULL,
    waste_generated        REAL NOT NULL,
    additional_notes       TEXT,
    created_at             TEXT NOT NULL,
    modified_at            TEXT NOT NULL,
    history_at             TEXT NOT NULL,
    history_change         TEXT NOT NULL,
    history_reason         TEXT,
    history_user           TEXT
);
CREATE INDEX environmental_metrics_history_date_idx ON environmental_metrics_history(date);

CREATE TABLE energy_usage (
    date             TEXT PRIMARY KEY,
    electricity_kwh  REAL NOT NULL,
    electricity_cost REAL NOT NULL,
    diesel_liters    REAL NOT NULL,
    diesel_cost      REAL NOT NULL,
    total_cost       REAL NOT NULL,   -- always electricity_cost + diesel_cost
    created_at       TEXT NOT NULL,
    modified_at      TEXT NOT NULL
);

CREATE TABLE energy_usage_history (
    history_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    date             TEXT NOT NULL,
    electricity_kwh  REAL NOT NULL,
    electricity_cost REAL NOT NULL,
    diesel_liters    REAL NOT NULL,
    diesel_cost      REAL NOT NULL,
    total_cost       REAL NOT NULL,
    created_at       TEXT NOT NULL,
    modified_at      TEXT NOT NULL,
    history_at       TEXT NOT NULL,
    history_change   TEXT NOT NULL,
    history_reason   TEXT,
    history_user     TEXT
);
CREATE INDEX energy_usage_history_date_idx ON energy_usage_history(date);

CREATE TABLE smelted_gold (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    date              TEXT NOT NULL,
    site_id           INTEGER NOT NULL REFERENCES sites(site_id),
    total_weight      REAL NOT NULL,
    purity_percentage REAL NOT NULL,
    notes             TEXT,
    created_at        TEXT NOT NULL,
    modified_at       TEXT NOT NULL,
    UNIQUE (date, site_id)
);

CREATE TABLE smelted_gold_history (
    history_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    id                INTEGER NOT NULL,
    date              TEXT NOT NULL,
    site_id           INTEGER NOT NULL,
    total_weight      REAL NOT NULL,
    purity_percentage REAL NOT NULL,
    notes             TEXT,
    created_at        TEXT NOT NULL,
    modified_at       TEXT NOT NULL,
    history_at        TEXT NOT NULL,
    history_change    TEXT NOT NULL,
    history_reason    TEXT,
    history_user      TEXT
);
CREATE INDEX smelted_gold_history_id_idx ON smelted_gold_history(id);

-- v1 stores the shift as its legacy enumeration label; the v2 migration
-- converts it to a shifts(shift_id) reference.
CREATE TABLE labor_metrics (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    date               TEXT NOT NULL,
    department_id      INTEGER NOT NULL REFERENCES departments(department_id),
    shift              TEXT,   -- 'MORNING' | 'AFTERNOON' | 'NIGHT' | NULL
    workers_present    INTEGER NOT NULL,
    hours_worked       REAL NOT NULL,
    overtime_hours     REAL NOT NULL,
    productivity_index REAL NOT NULL,
    safety_incidents   INTEGER NOT NULL,
    created_at         TEXT NOT NULL,
    modified_at        TEXT NOT NULL,
    UNIQUE (date, department_id, shift)
);

CREATE TABLE labor_metrics_history (
    history_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    id                 INTEGER NOT NULL,
    date               TEXT NOT NULL,
    department_id      INTEGER NOT NULL,
    shift              TEXT,
    workers_present    INTEGER NOT NULL,
    hours_worked       REAL NOT NULL,
    overtime_hours     REAL NOT NULL,
    productivity_index REAL NOT NULL,
    safety_incidents   INTEGER NOT NULL,
    created_at         TEXT NOT NULL,
    modified_at        TEXT NOT NULL,
    history_at         TEXT NOT NULL,
    history_change     TEXT NOT NULL,
    history_reason     TEXT,
    history_user       TEXT
);
CREATE INDEX labor_metrics_history_id_idx ON labor_metrics_history(id);
";
