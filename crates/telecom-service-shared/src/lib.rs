//! Shared infrastructure for the telecom HTTP microservices.
//!
//! - [`AppState`]: object repository handle shared by all handlers
//! - [`ServiceConfig`]: data path, port and default-point switch
//! - [`health_live`] and [`health_ready`]: liveness and readiness probes
//! - [`ProblemDetails`]: RFC 9457 error responses
//! - [`ServiceResponse`]: wrapper for successful responses
//! - [`metrics`]: Prometheus recorder and business metrics
//! - [`logging`]: structured JSON or text logging
//! - [`middleware`]: request IDs and HTTP metrics
//! - Query-string request types with validation
//!
//! Handlers stay thin: parse the query, validate, fetch a snapshot on the
//! blocking pool, call `telecom-lib`, wrap the result.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides an in-memory inventory and a temporary
//! SQLite fixture. Enable the `test-utils` feature to use it from dependent
//! crates.

mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ServiceConfig, DEFAULT_DATA_PATH, DEFAULT_PORT};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_candidates_ranked, record_catalog_query,
    record_connection_checked, record_connection_failed, record_default_point_used,
    MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_COORDINATES,
    PROBLEM_INVALID_REQUEST, PROBLEM_OBJECT_NOT_FOUND, PROBLEM_SERVICE_UNAVAILABLE,
};
pub use request::{
    CheckConnectionRequest, MapDataRequest, ObjectListRequest, RouteListRequest, SearchRequest,
    Validate,
};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError, DEFAULT_SERVICE_NAME};
