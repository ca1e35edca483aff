//! Connection feasibility HTTP microservice.
//!
//! Answers whether a new subscriber can be connected at a coordinate, based
//! on the eligible infrastructure objects within the service radius.
//!
//! # Endpoints
//!
//! - `GET /api/check-connection/?lat=&lng=&address=` - Check connection feasibility
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use telecom_lib::{ConnectionReport, evaluate};
use telecom_service_shared::{
    AppState, CheckConnectionRequest, MetricsLayer, ProblemDetails, ServiceResponse, Validate,
    extract_or_generate_request_id, from_lib_error, health_live, health_ready, metrics_handler,
    record_candidates_ranked, record_connection_checked, record_connection_failed,
    record_default_point_used,
};

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(ServiceResponse<ConnectionReport>),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Build the service router around `state`.
///
/// Health endpoints report this crate's name and version.
pub fn app(state: AppState) -> Router {
    let state = state.with_service(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Router::new()
        .route("/api/check-connection/", get(check_connection_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle GET /api/check-connection/ requests.
async fn check_connection_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<CheckConnectionRequest>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    info!(
        request_id = %request_id,
        lat = ?request.lat,
        lng = ?request.lng,
        "handling connection check"
    );

    if let Err(problem) = request.validate(request_id) {
        record_connection_failed("invalid_coordinates");
        return Response::Error(*problem);
    }

    let query = match request.to_query(state.allow_default_point(), request_id) {
        Ok(query) => query,
        Err(problem) => {
            record_connection_failed("missing_coordinates");
            return Response::Error(*problem);
        }
    };

    if query.is_default_point() {
        warn!(request_id = %request_id, "no coordinates supplied; answering for default point");
        record_default_point_used();
    }

    // One snapshot per request, read on the blocking pool
    let repository = state.repository();
    let snapshot =
        tokio::task::spawn_blocking(move || repository.fetch_active_with_free_capacity()).await;

    let objects = match snapshot {
        Ok(Ok(objects)) => objects,
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "inventory fetch failed");
            record_connection_failed("repository");
            return Response::Error(from_lib_error(&e, request_id));
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "inventory fetch task failed");
            record_connection_failed("internal_error");
            return Response::Error(ProblemDetails::internal_error(
                "Connection check could not be completed",
                request_id,
            ));
        }
    };

    let verdict = evaluate(query.point, &objects);
    record_connection_checked(verdict.outcome);
    record_candidates_ranked(verdict.ranked.len());

    let report = ConnectionReport::assemble(&query, &verdict);

    info!(
        request_id = %request_id,
        outcome = verdict.outcome.as_str(),
        eligible = objects.len(),
        in_range = verdict.in_range.len(),
        technology = ?report.technology,
        "connection check completed"
    );

    Response::Success(ServiceResponse::new(report))
}
