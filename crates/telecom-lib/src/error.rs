use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the telecom library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate was supplied but could not be read as a finite number.
    #[error("invalid {field} coordinate: '{value}' is not a finite number")]
    InvalidCoordinate { field: &'static str, value: String },

    /// Coordinates were omitted and the default query point is disabled.
    #[error("both 'lat' and 'lng' coordinates are required")]
    MissingCoordinates,

    /// A catalog filter value is not one of the known codes.
    #[error("unknown {field} filter value '{value}'")]
    InvalidFilter { field: &'static str, value: String },

    /// Raised when a catalog search term is shorter than the accepted minimum.
    #[error("search query must be at least {min} characters long")]
    QueryTooShort { min: usize },

    /// Raised when an infrastructure object could not be found by record id.
    #[error("infrastructure object {id} not found")]
    ObjectNotFound { id: i64 },

    /// Inventory database could not be located at the resolved path.
    #[error("inventory database not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// Raised when the database contains neither supported table layout.
    #[error(
        "unsupported inventory schema; expected telecom_net_infrastructureobject or infrastructure_objects tables"
    )]
    UnsupportedSchema,

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by caller input rather than the repository.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCoordinate { .. }
                | Error::MissingCoordinates
                | Error::InvalidFilter { .. }
                | Error::QueryTooShort { .. }
        )
    }
}
