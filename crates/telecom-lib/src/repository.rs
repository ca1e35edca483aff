//! Object repository seam between the engine and persistent storage.
//!
//! The feasibility engine never owns data: it asks a repository for a fresh
//! snapshot on every query. Two implementations are provided. [`Inventory`]
//! serves an in-memory snapshot (tests, embedding), and [`SqliteRepository`]
//! re-reads an existing database on each fetch so that edits made by the admin
//! backend are visible without a restart.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::db::{
    detect_layout, load_eligible_objects_with_layout, load_inventory_with_layout, SchemaLayout,
};
use crate::error::{Error, Result};
use crate::inventory::{InfrastructureObject, Inventory};

/// Source of infrastructure object snapshots.
///
/// Implementations must be safe to share between request-handling threads.
/// Transient failures are returned as errors; retry policy belongs to the
/// caller.
pub trait ObjectRepository: Send + Sync {
    /// All active objects with at least one free port.
    fn fetch_active_with_free_capacity(&self) -> Result<Vec<InfrastructureObject>>;

    /// Full snapshot including inactive objects and cable routes.
    fn fetch_inventory(&self) -> Result<Inventory>;
}

impl ObjectRepository for Inventory {
    fn fetch_active_with_free_capacity(&self) -> Result<Vec<InfrastructureObject>> {
        Ok(self.eligible_objects().cloned().collect())
    }

    fn fetch_inventory(&self) -> Result<Inventory> {
        Ok(self.clone())
    }
}

/// Repository backed by an SQLite inventory database.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    path: PathBuf,
    layout: SchemaLayout,
}

impl SqliteRepository {
    /// Open a repository, verifying that the database exists and uses a
    /// supported table layout.
    ///
    /// The layout detected here is reused by every fetch.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }

        let layout = detect_layout(path)?;
        info!(path = %path.display(), layout = %layout, "opened inventory database");

        Ok(Self {
            path: path.to_path_buf(),
            layout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> SchemaLayout {
        self.layout
    }
}

impl ObjectRepository for SqliteRepository {
    fn fetch_active_with_free_capacity(&self) -> Result<Vec<InfrastructureObject>> {
        let objects = load_eligible_objects_with_layout(&self.path, self.layout)?;
        debug!(count = objects.len(), "fetched eligible objects");
        Ok(objects)
    }

    fn fetch_inventory(&self) -> Result<Inventory> {
        load_inventory_with_layout(&self.path, self.layout)
    }
}
