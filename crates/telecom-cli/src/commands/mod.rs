// Module exports for CLI subcommands
//
// Each module handles one subcommand; main.rs parses arguments and dispatches.

pub mod check;
pub mod map_data;
pub mod search;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};

use telecom_lib::{Inventory, ObjectRepository, SqliteRepository};

/// Open the inventory database, validating its table layout.
pub fn open_repository(database: &Path) -> Result<SqliteRepository> {
    SqliteRepository::open(database)
        .with_context(|| format!("failed to open inventory database {}", database.display()))
}

/// Load a full inventory snapshot for catalog commands.
pub fn load_snapshot(database: &Path) -> Result<Inventory> {
    open_repository(database)?
        .fetch_inventory()
        .with_context(|| format!("failed to read inventory from {}", database.display()))
}
