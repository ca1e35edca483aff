//! Telecom infrastructure library entry points.
//!
//! This crate loads the infrastructure inventory (objects, cable routes and
//! their work history) from SQLite, answers connection-feasibility queries
//! for arbitrary coordinates and serves the read-only catalog queries behind
//! the network map. Higher-level consumers (CLI, HTTP services) should only depend on the
//! functions exported here instead of reimplementing behavior.

pub mod catalog;
pub mod db;
pub mod error;
pub mod feasibility;
pub mod geo;
pub mod inventory;
pub mod output;
pub mod repository;

pub use catalog::{
    connected_routes, list_objects, list_routes, map_data, object_history, search, stats,
    InventoryStats, MapData, MapFilter, ObjectFilter, RouteFilter, SearchResults,
};
pub use db::{detect_layout, load_inventory, load_inventory_with_layout, SchemaLayout};
pub use error::{Error, Result};
pub use feasibility::{
    check_connection, evaluate, Candidate, ConnectionQuery, Outcome, QueryOrigin, Verdict,
    DEFAULT_QUERY_POINT, MAX_CANDIDATES, SERVICE_RADIUS_M,
};
pub use geo::{haversine_distance_m, GeoPoint};
pub use inventory::{
    CableRoute, CableType, HistoryAction, HistoryEntry, InfrastructureObject, Inventory, ObjectId,
    ObjectStatus, ObjectType, RouteType, Technology,
};
pub use output::{
    CableRouteSummary, ConnectionReport, ConnectionStatus, HistoryEntrySummary, ObjectSummary,
};
pub use repository::{ObjectRepository, SqliteRepository};
