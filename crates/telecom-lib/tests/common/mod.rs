#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

/// Reference point used by the fixtures (Dushanbe city centre).
pub const ORIGIN: (f64, f64) = (38.56, 68.78);

/// A fixture database living in its own temporary directory.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

/// Inventory database in the layout created by the Django admin backend.
///
/// Objects, measured from [`ORIGIN`]:
/// - `OLT-001` GPON, ~556 m north, 16 free ports
/// - `ATS-001` ADSL, ~1112 m north, 4 free ports
/// - `SW-001` Ethernet, ~4448 m north, 2 free ports
/// - `SB-001` no technology, ~111 m north, no free ports
/// - `CL-001` inactive client exactly at the origin
///
/// Three cable routes and three history entries (two for `OLT-001`) are
/// included.
pub fn django_fixture() -> Fixture {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("telecom.db");
    write_django_schema(&path);
    Fixture { _dir: dir, path }
}

/// Same objects in the standalone layout with only the required columns.
pub fn standalone_fixture() -> Fixture {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("inventory.db");
    let conn = Connection::open(&path).expect("open fixture db");
    conn.execute_batch(
        r#"
        CREATE TABLE infrastructure_objects (
            id INTEGER PRIMARY KEY,
            object_id TEXT NOT NULL,
            name TEXT NOT NULL,
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            free_ports INTEGER NOT NULL,
            is_active INTEGER NOT NULL
        );
        INSERT INTO infrastructure_objects VALUES
            (1, 'OLT-001', 'Central OLT', 38.565, 68.78, 16, 1),
            (2, 'ATS-001', 'Exchange No. 1', 38.57, 68.78, 4, 1),
            (3, 'SW-001', 'North switch', 38.60, 68.78, 2, 1);
        "#,
    )
    .expect("create standalone schema");
    Fixture { _dir: dir, path }
}

/// Django layout with both tables present but no rows.
pub fn empty_fixture() -> Fixture {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("empty.db");
    let conn = Connection::open(&path).expect("open fixture db");
    conn.execute_batch(DJANGO_SCHEMA).expect("create schema");
    Fixture { _dir: dir, path }
}

const DJANGO_SCHEMA: &str = r#"
    CREATE TABLE telecom_net_infrastructureobject (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        object_id VARCHAR(50) NOT NULL UNIQUE,
        name VARCHAR(200) NOT NULL,
        object_type VARCHAR(20) NOT NULL,
        address TEXT NOT NULL,
        lat DECIMAL NOT NULL,
        lng DECIMAL NOT NULL,
        technology VARCHAR(20) NOT NULL,
        capacity INTEGER NOT NULL,
        free_ports INTEGER NOT NULL,
        parent_id BIGINT NULL,
        technical_notes TEXT NOT NULL,
        installation_date DATE NULL,
        last_maintenance DATE NULL,
        next_maintenance DATE NULL,
        notes TEXT NOT NULL,
        status VARCHAR(20) NOT NULL,
        created_at DATETIME NOT NULL,
        updated_at DATETIME NOT NULL,
        is_active BOOL NOT NULL
    );
    CREATE TABLE telecom_net_cableroute (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(200) NOT NULL,
        from_object_id BIGINT NOT NULL,
        to_object_id BIGINT NOT NULL,
        cable_type VARCHAR(20) NOT NULL,
        route_type VARCHAR(20) NOT NULL,
        length INTEGER NOT NULL,
        fiber_count INTEGER NOT NULL,
        installation_notes TEXT NOT NULL,
        technical_specs TEXT NOT NULL,
        tested_date DATE NULL,
        test_results TEXT NOT NULL,
        installed_date DATE NULL,
        notes TEXT NOT NULL,
        created_at DATETIME NOT NULL,
        is_active BOOL NOT NULL
    );
    CREATE TABLE telecom_net_objecthistory (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        action VARCHAR(20) NOT NULL,
        description TEXT NOT NULL,
        photo VARCHAR(100) NULL,
        performed_by VARCHAR(100) NOT NULL,
        performed_date DATETIME NOT NULL,
        infrastructure_object_id BIGINT NOT NULL
    );
"#;

fn write_django_schema(path: &Path) {
    let conn = Connection::open(path).expect("open fixture db");
    conn.execute_batch(DJANGO_SCHEMA).expect("create schema");
    conn.execute_batch(
        r#"
        INSERT INTO telecom_net_infrastructureobject VALUES
            (1, 'OLT-001', 'Central OLT', 'olt', 'Rudaki 1', 38.565, 68.78, 'gpon', 64, 16,
             NULL, 'Main fiber hub', '2021-04-01', '2024-02-10', NULL, '', 'active',
             '2021-04-01 10:00:00', '2024-02-10 10:00:00', 1),
            (2, 'ATS-001', 'Exchange No. 1', 'ats', 'Somoni 5', 38.57, 68.78, 'adsl', 100, 4,
             NULL, '', NULL, NULL, NULL, '', 'active',
             '2019-01-01 10:00:00', '2019-01-01 10:00:00', 1),
            (3, 'SW-001', 'North switch', 'switch', 'Ayni 40', 38.60, 68.78, 'ethernet', 24, 2,
             1, '', NULL, NULL, '2025-13-45', 'Rooftop cabinet', 'active',
             '2022-06-01 10:00:00', '2022-06-01 10:00:00', 1),
            (4, 'SB-001', 'Splice box Rudaki', 'splice_box', 'Rudaki 12', 38.561, 68.78, '', 24, 0,
             1, '', NULL, NULL, NULL, '', 'planned',
             '2023-03-01 10:00:00', '2023-03-01 10:00:00', 1),
            (5, 'CL-001', 'Retired client', 'client', 'Origin square', 38.56, 68.78, 'gpon', 1, 1,
             4, '', NULL, NULL, NULL, '', 'inactive',
             '2020-01-01 10:00:00', '2020-01-01 10:00:00', 0);

        INSERT INTO telecom_net_cableroute VALUES
            (1, 'Feeder OLT-SB', 1, 4, 'fiber', 'underground', 560, 48, '', 'G.652D',
             '2024-04-02', 'OTDR: 0.21 dB/km', '2021-05-01', '', '2021-05-01 10:00:00', 1),
            (2, 'Backbone OLT-SW', 1, 3, 'fiber', 'aerial', 4000, 24, 'Crosses Rudaki avenue', '',
             NULL, '', NULL, '', '2022-06-01 10:00:00', 1),
            (3, 'Old copper', 2, 5, 'copper', 'indoor', 900, 1, '', '', NULL, '', NULL,
             'Decommissioned', '2019-01-01 10:00:00', 0);

        INSERT INTO telecom_net_objecthistory VALUES
            (1, 'created', 'Installed in the Rudaki cabinet', NULL, 'Installation crew',
             '2021-04-01 10:00:00', 1),
            (2, 'maintenance', 'Replaced PON card 3', NULL, 'Field crew',
             '2024-02-10 09:30:00.123456', 1),
            (3, 'painted', 'Cabinet repainted', NULL, 'Facilities', '2023-07-15', 3);
        "#,
    )
    .expect("insert fixture rows");
}
