//! Health check handlers for Kubernetes probes.
//!
//! `/health/live` answers as long as the process runs. `/health/ready`
//! fetches a snapshot from the repository and reports how many objects it
//! holds; an unreadable inventory makes the service not ready.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    pub service: String,

    pub version: String,

    /// Number of infrastructure objects in the inventory (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_loaded: Option<usize>,

    /// Number of objects able to accept a new connection (readiness only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligible_objects: Option<usize>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            objects_loaded: None,
            eligible_objects: None,
        }
    }

    pub fn ready(service: &str, version: &str, objects: usize, eligible: usize) -> Self {
        Self {
            objects_loaded: Some(objects),
            eligible_objects: Some(eligible),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            ..Self::alive(service, version)
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"telecom-service-connection","version":"0.1.0"}
/// ```
pub async fn health_live(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus::alive(state.service_name(), state.service_version());
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// An empty inventory is still ready: queries then answer "no connection
/// points available".
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"telecom-service-connection","version":"0.1.0","objects_loaded":812,"eligible_objects":640}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = state.service_name().to_string();
    let version = state.service_version().to_string();

    let repository = state.repository();
    let snapshot = tokio::task::spawn_blocking(move || repository.fetch_inventory()).await;

    match snapshot {
        Ok(Ok(inventory)) => {
            let status = HealthStatus::ready(
                &service,
                &version,
                inventory.objects.len(),
                inventory.eligible_objects().count(),
            );
            (StatusCode::OK, Json(status)).into_response()
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "readiness check failed");
            let status = HealthStatus::not_ready(&service, &version, "inventory unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "readiness task failed");
            let status = HealthStatus::not_ready(&service, &version, "internal error");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}
