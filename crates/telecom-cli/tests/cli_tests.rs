//! Integration tests for the CLI subcommands.
//!
//! Each test writes a small standalone-layout inventory into a temporary
//! directory and runs the binary against it with `assert_cmd`.

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use serde_json::Value;
use tempfile::TempDir;

/// Temporary inventory database around (38.56, 68.78).
struct TestEnv {
    _temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("telecom.db");
        let conn = Connection::open(&db_path).expect("open fixture db");
        conn.execute_batch(
            r#"
            CREATE TABLE infrastructure_objects (
                id INTEGER PRIMARY KEY,
                object_id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                object_type TEXT,
                address TEXT,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                technology TEXT,
                capacity INTEGER,
                free_ports INTEGER NOT NULL,
                parent_id INTEGER,
                status TEXT,
                is_active INTEGER NOT NULL
            );
            INSERT INTO infrastructure_objects VALUES
                (1, 'OLT-001', 'Central OLT', 'olt', 'Rudaki 1', 38.565, 68.78, 'gpon', 64, 16, NULL, 'active', 1),
                (2, 'ATS-001', 'Exchange No. 1', 'ats', 'Somoni 12', 38.57, 68.78, 'adsl', 100, 4, NULL, 'active', 1),
                (3, 'SW-001', 'North switch', 'switch', 'Ismoili Somoni 40', 38.60, 68.78, 'ethernet', 24, 2, 1, 'active', 1),
                (4, 'SB-001', 'Splice box Rudaki', 'splice_box', 'Rudaki 3', 38.561, 68.78, NULL, 24, 0, 1, 'planned', 1);

            CREATE TABLE cable_routes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                from_object_id INTEGER NOT NULL,
                to_object_id INTEGER NOT NULL,
                length INTEGER,
                installation_notes TEXT,
                is_active INTEGER NOT NULL
            );
            INSERT INTO cable_routes VALUES
                (1, 'Backbone OLT-SW', 1, 3, 4000, 'Crosses Rudaki avenue', 1),
                (2, 'Old copper', 2, 3, 3500, '', 0);
            "#,
        )
        .expect("create fixture schema");

        Self {
            _temp_dir: temp_dir,
            db_path,
        }
    }

    fn cli(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("telecom-cli");
        cmd.env_remove("TELECOM_DATA_PATH")
            .env("RUST_LOG", "error")
            .arg("--database")
            .arg(&self.db_path);
        cmd
    }
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run telecom-cli");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_near_olt_reports_gpon() {
    let env = TestEnv::new();
    env.cli()
        .args(["check", "--lat", "38.56", "--lng", "68.78", "--address", "Rudaki 1"])
        .assert()
        .success()
        .stdout(contains_all(&[
            "Address: Rudaki 1",
            "Connection AVAILABLE",
            "Nearest point: Central OLT",
            "Technology: GPON",
            "In range:",
            "ATS-001",
        ]))
        .stdout(predicate::str::contains("SB-001").not());
}

#[test]
fn check_json_matches_service_payload() {
    let env = TestEnv::new();
    let body = json_stdout(env.cli().args([
        "--format", "json", "check", "--lat", "38.56", "--lng", "68.78",
    ]));

    assert_eq!(body["status"], "available");
    assert_eq!(body["technology"], "GPON");
    assert_eq!(body["nearest_objects"][0]["object_id"], "OLT-001");
    assert!(body["distances"]["OLT-001"].as_u64().unwrap() < 600);
    assert!(body.get("default_point_used").is_none());
}

#[test]
fn check_far_away_needs_new_cable() {
    let env = TestEnv::new();
    env.cli()
        .args(["check", "--lat", "38.64", "--lng", "68.78"])
        .assert()
        .success()
        .stdout(contains_all(&[
            "NOT AVAILABLE",
            "Nearest point: North switch",
            "New cable installation required",
        ]));
}

#[test]
fn check_without_coordinates_uses_default_point() {
    let env = TestEnv::new();
    let body = json_stdout(env.cli().args(["--format", "json", "check"]));
    assert_eq!(body["default_point_used"], true);
    assert_eq!(body["available"], true);
}

#[test]
fn check_without_coordinates_fails_when_fallback_disabled() {
    let env = TestEnv::new();
    env.cli()
        .args(["check", "--lat", "38.56", "--no-default-point"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("coordinates are required"));
}

#[test]
fn check_rejects_malformed_latitude() {
    let env = TestEnv::new();
    env.cli()
        .args(["check", "--lat", "north", "--lng", "68.78"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid lat coordinate"));
}

#[test]
fn check_accepts_negative_coordinates() {
    let env = TestEnv::new();
    env.cli()
        .args(["check", "--lat", "-33.86", "--lng", "151.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NOT AVAILABLE"));
}

// =============================================================================
// catalog commands
// =============================================================================

#[test]
fn search_finds_objects_and_routes() {
    let env = TestEnv::new();
    env.cli()
        .args(["search", "rudaki"])
        .assert()
        .success()
        .stdout(contains_all(&[
            "Objects (2):",
            "OLT-001",
            "SB-001",
            "Cable routes (1):",
            "Backbone OLT-SW (Central OLT -> North switch, 4000 m)",
            "Total results: 3",
        ]));
}

#[test]
fn search_rejects_short_query() {
    let env = TestEnv::new();
    env.cli()
        .args(["search", "r"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn stats_json_reports_free_port_rate() {
    let env = TestEnv::new();
    let body = json_stdout(env.cli().args(["--format", "json", "stats"]));

    assert_eq!(body["total_objects"], 4);
    assert_eq!(body["total_capacity"], 212);
    assert_eq!(body["total_free_ports"], 22);
    assert_eq!(body["utilization_rate"], 10.38);
    assert_eq!(body["objects_by_status"]["planned"], 1);
    assert_eq!(body["objects_by_technology"]["none"], 1);
}

#[test]
fn stats_text_lists_breakdowns() {
    let env = TestEnv::new();
    env.cli()
        .arg("stats")
        .assert()
        .success()
        .stdout(contains_all(&["Total objects:  4", "By technology:", "Free port rate:   10.38%"]));
}

#[test]
fn map_data_filters_objects_and_skips_inactive_routes() {
    let env = TestEnv::new();
    let body = json_stdout(env.cli().args(["--format", "json", "map-data", "--technology", "gpon"]));

    let objects = body["infrastructure_objects"].as_array().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0]["object_id"], "OLT-001");
    assert_eq!(objects[0]["children_count"], 2);
    assert_eq!(body["cable_routes"].as_array().unwrap().len(), 1);
}

#[test]
fn map_data_rejects_unknown_type() {
    let env = TestEnv::new();
    env.cli()
        .args(["map-data", "--object-type", "tower"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown object_type filter value 'tower'"));
}

// =============================================================================
// database resolution
// =============================================================================

#[test]
fn missing_database_file_is_reported() {
    let temp_dir = TempDir::new().expect("create temp dir");
    cargo_bin_cmd!("telecom-cli")
        .env("RUST_LOG", "error")
        .arg("--database")
        .arg(temp_dir.path().join("absent.db"))
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("inventory database not found"));
}

#[test]
fn database_path_falls_back_to_environment() {
    let env = TestEnv::new();
    cargo_bin_cmd!("telecom-cli")
        .env("TELECOM_DATA_PATH", &env.db_path)
        .env("RUST_LOG", "error")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total objects:  4"));
}

#[test]
fn database_is_required() {
    cargo_bin_cmd!("telecom-cli")
        .env_remove("TELECOM_DATA_PATH")
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TELECOM_DATA_PATH"));
}

fn contains_all(needles: &[&str]) -> impl Predicate<str> {
    let owned: Vec<String> = needles.iter().map(|s| s.to_string()).collect();
    predicate::function(move |out: &str| owned.iter().all(|needle| out.contains(needle.as_str())))
}
