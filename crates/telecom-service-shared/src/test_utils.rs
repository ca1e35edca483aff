//! Test utilities for microservice handler testing.
//!
//! [`test_state`] serves a small in-memory inventory around the default query
//! point; [`FixtureDb`] writes the same objects to a temporary SQLite file for
//! tests that need the real repository.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use chrono::NaiveDate;
use telecom_lib::{
    CableRoute, CableType, HistoryAction, HistoryEntry, InfrastructureObject, Inventory,
    ObjectType, RouteType, Technology,
};
use tempfile::TempDir;

use crate::state::AppState;

/// Objects in the test inventory, measured from (38.56, 68.78).
pub mod fixture_objects {
    /// GPON OLT about 556 m north, 16 free ports.
    pub const OLT: &str = "OLT-001";
    /// ADSL exchange about 1112 m north, 4 free ports.
    pub const ATS: &str = "ATS-001";
    /// Ethernet switch about 4448 m north, 2 free ports.
    pub const SWITCH: &str = "SW-001";
    /// Splice box about 111 m north with no free ports.
    pub const SPLICE_BOX: &str = "SB-001";

    /// Record id of the OLT.
    pub const OLT_ID: i64 = 1;
}

/// The in-memory inventory used by [`test_state`].
pub fn test_inventory() -> Inventory {
    let objects = vec![
        InfrastructureObject::builder(1, fixture_objects::OLT)
            .name("Central OLT")
            .address("Rudaki 1")
            .at(38.565, 68.78)
            .technology(Technology::Gpon)
            .ports(64, 16)
            .build(),
        InfrastructureObject::builder(2, fixture_objects::ATS)
            .name("Exchange No. 1")
            .object_type(ObjectType::Ats)
            .at(38.57, 68.78)
            .technology(Technology::Adsl)
            .ports(100, 4)
            .build(),
        InfrastructureObject::builder(3, fixture_objects::SWITCH)
            .name("North switch")
            .object_type(ObjectType::Switch)
            .at(38.60, 68.78)
            .technology(Technology::Ethernet)
            .ports(24, 2)
            .parent(1)
            .build(),
        InfrastructureObject::builder(4, fixture_objects::SPLICE_BOX)
            .name("Splice box Rudaki")
            .object_type(ObjectType::SpliceBox)
            .at(38.561, 68.78)
            .ports(24, 0)
            .parent(1)
            .build(),
    ];
    let routes = vec![
        CableRoute {
            id: 1,
            name: "Backbone OLT-SW".to_string(),
            from_object: 1,
            to_object: 3,
            cable_type: CableType::Fiber,
            route_type: RouteType::Underground,
            length: 4000,
            fiber_count: 24,
            installation_notes: "Crosses Rudaki avenue".to_string(),
            technical_specs: String::new(),
            installed_date: None,
            tested_date: NaiveDate::from_ymd_opt(2024, 4, 2),
            test_results: "OTDR: 0.21 dB/km".to_string(),
            notes: String::new(),
            is_active: true,
        },
        CableRoute {
            id: 2,
            name: "Old copper ATS-SB".to_string(),
            from_object: 2,
            to_object: 4,
            cable_type: CableType::Copper,
            route_type: RouteType::Aerial,
            length: 900,
            fiber_count: 1,
            installation_notes: String::new(),
            technical_specs: String::new(),
            installed_date: None,
            tested_date: None,
            test_results: String::new(),
            notes: "Decommissioned".to_string(),
            is_active: false,
        },
    ];
    let history = vec![
        HistoryEntry {
            id: 1,
            object: 1,
            action: HistoryAction::Created,
            description: "Installed in the Rudaki cabinet".to_string(),
            performed_by: "Installation crew".to_string(),
            performed_at: NaiveDate::from_ymd_opt(2021, 4, 1).and_then(|d| d.and_hms_opt(10, 0, 0)),
        },
        HistoryEntry {
            id: 2,
            object: 1,
            action: HistoryAction::Maintenance,
            description: "Replaced PON card 3".to_string(),
            performed_by: "Field crew".to_string(),
            performed_at: NaiveDate::from_ymd_opt(2024, 2, 10).and_then(|d| d.and_hms_opt(9, 30, 0)),
        },
    ];
    Inventory::new(objects, routes).with_history(history)
}

/// Application state backed by [`test_inventory`].
pub fn test_state() -> AppState {
    AppState::from_inventory(test_inventory())
}

/// Temporary SQLite database holding the [`test_inventory`] objects in the
/// standalone table layout. Removed on drop.
pub struct FixtureDb {
    _dir: TempDir,
    path: PathBuf,
}

impl FixtureDb {
    /// # Panics
    ///
    /// Panics if the temporary database cannot be written. This indicates a
    /// test environment issue.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("telecom.db");
        write_fixture(&path).expect("write fixture database");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FixtureDb {
    fn default() -> Self {
        Self::new()
    }
}

fn write_fixture(path: &Path) -> rusqlite::Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE infrastructure_objects (
            id INTEGER PRIMARY KEY,
            object_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            object_type TEXT,
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            technology TEXT,
            capacity INTEGER,
            free_ports INTEGER NOT NULL,
            parent_id INTEGER,
            is_active INTEGER NOT NULL
        );",
    )?;

    let inventory = test_inventory();
    let mut stmt = conn.prepare(
        "INSERT INTO infrastructure_objects
            (id, object_id, name, object_type, lat, lng, technology, capacity, free_ports, parent_id, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;
    for object in &inventory.objects {
        stmt.execute(rusqlite::params![
            object.id,
            object.object_id,
            object.name,
            object.object_type.code(),
            object.lat,
            object.lng,
            object.technology.map(Technology::code),
            object.capacity,
            object.free_ports,
            object.parent,
            object.is_active,
        ])?;
    }
    Ok(())
}

/// Generate a unique request ID for testing.
pub fn test_request_id() -> String {
    format!("test-{}", uuid::Uuid::now_v7())
}
