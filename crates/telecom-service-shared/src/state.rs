//! Application state for HTTP microservices.
//!
//! Services never hold a copy of the inventory: the state carries the object
//! repository, and every request fetches a fresh snapshot from it.

use std::path::Path;
use std::sync::Arc;

use telecom_lib::{Error as LibError, Inventory, ObjectRepository, SqliteRepository};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open the inventory database.
    RepositoryOpen(LibError),

    /// Database file not found.
    DatabaseNotFound(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RepositoryOpen(e) => write!(f, "failed to open inventory database: {}", e),
            Self::DatabaseNotFound(path) => write!(f, "database not found: {}", path),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RepositoryOpen(e) => Some(e),
            Self::DatabaseNotFound(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::RepositoryOpen(err)
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable; share it via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use telecom_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let repository = state.repository();
///     // ... fetch a snapshot inside spawn_blocking
/// }
///
/// let state = AppState::load("/data/telecom.db").unwrap();
/// let app = Router::new()
///     .route("/api/check-connection/", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repository: Arc<dyn ObjectRepository>,
    source: String,
    allow_default_point: bool,
    service_name: String,
    service_version: String,
}

impl AppStateInner {
    fn rebuilt(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            source: self.source.clone(),
            allow_default_point: self.allow_default_point,
            service_name: self.service_name.clone(),
            service_version: self.service_version.clone(),
        }
    }
}

/// Service name reported by health checks until a service sets its own.
pub const DEFAULT_SERVICE_NAME: &str = "telecom-service";

impl AppState {
    /// Open the SQLite inventory database at `db_path`.
    ///
    /// The database is only validated here (existence and table layout); rows
    /// are read per request. The default query point is enabled.
    pub fn load(db_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();

        if !db_path.exists() {
            return Err(AppStateError::DatabaseNotFound(
                db_path.display().to_string(),
            ));
        }

        tracing::info!(path = %db_path.display(), "opening inventory database");
        let repository = SqliteRepository::open(db_path)?;
        tracing::info!(layout = %repository.layout(), "inventory database ready");

        Ok(Self::from_repository(
            Arc::new(repository),
            db_path.display().to_string(),
        ))
    }

    /// Create state around an arbitrary repository.
    pub fn from_repository(repository: Arc<dyn ObjectRepository>, source: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                repository,
                source: source.into(),
                allow_default_point: true,
                service_name: DEFAULT_SERVICE_NAME.to_string(),
                service_version: env!("CARGO_PKG_VERSION").to_string(),
            }),
        }
    }

    /// Create state serving a fixed in-memory inventory.
    ///
    /// This is useful for testing.
    pub fn from_inventory(inventory: Inventory) -> Self {
        Self::from_repository(Arc::new(inventory), "memory")
    }

    /// Return a copy of this state with the default-point fallback switched.
    pub fn with_default_point(self, allow: bool) -> Self {
        let mut inner = self.inner.rebuilt();
        inner.allow_default_point = allow;
        Self { inner: Arc::new(inner) }
    }

    /// Return a copy of this state that reports `name` and `version` from
    /// its health endpoints.
    ///
    /// Each service binary passes its own `CARGO_PKG_NAME` and
    /// `CARGO_PKG_VERSION`.
    pub fn with_service(self, name: impl Into<String>, version: impl Into<String>) -> Self {
        let mut inner = self.inner.rebuilt();
        inner.service_name = name.into();
        inner.service_version = version.into();
        Self { inner: Arc::new(inner) }
    }

    /// Shared handle to the object repository, suitable for moving into
    /// `spawn_blocking`.
    pub fn repository(&self) -> Arc<dyn ObjectRepository> {
        Arc::clone(&self.inner.repository)
    }

    /// Where the inventory is read from (database path or `memory`).
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// Whether queries without coordinates fall back to the default point.
    pub fn allow_default_point(&self) -> bool {
        self.inner.allow_default_point
    }

    pub fn service_name(&self) -> &str {
        &self.inner.service_name
    }

    pub fn service_version(&self) -> &str {
        &self.inner.service_version
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.inner.service_name)
            .field("source", &self.inner.source)
            .field("allow_default_point", &self.inner.allow_default_point)
            .finish()
    }
}
