//! Infrastructure catalog HTTP microservice.
//!
//! Read-only views over the network inventory for the map and the object
//! registry.
//!
//! # Endpoints
//!
//! - `GET /api/map-data/?object_type=&technology=` - Active objects and cable routes
//! - `GET /api/search/?q=` - Free-text search over objects and routes
//! - `GET /api/infrastructure/` - Filtered object listing
//! - `GET /api/infrastructure/stats/` - Inventory statistics
//! - `GET /api/infrastructure/{id}/connected-routes/` - Routes touching an object
//! - `GET /api/infrastructure/{id}/history/` - Work history of an object
//! - `GET /api/cable-routes/?cable_type=&route_type=&is_active=` - Filtered route listing
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use telecom_lib::catalog::{self, InventoryStats, MapData, SearchResults};
use telecom_lib::{CableRouteSummary, HistoryEntrySummary, Inventory, ObjectId, ObjectSummary};
use telecom_service_shared::{
    AppState, MapDataRequest, MetricsLayer, ObjectListRequest, PROBLEM_OBJECT_NOT_FOUND,
    ProblemDetails, RouteListRequest, SearchRequest, ServiceResponse, Validate,
    extract_or_generate_request_id, from_lib_error, health_live, health_ready, metrics_handler,
    record_catalog_query,
};

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Object listing returned by `GET /api/infrastructure/`.
#[derive(Debug, Serialize)]
pub struct ObjectListResponse {
    pub count: usize,
    pub results: Vec<ObjectSummary>,
}

/// Routes returned by `GET /api/infrastructure/{id}/connected-routes/`.
#[derive(Debug, Serialize)]
pub struct ConnectedRoutesResponse {
    pub id: ObjectId,
    pub count: usize,
    pub cable_routes: Vec<CableRouteSummary>,
}

/// History returned by `GET /api/infrastructure/{id}/history/`.
#[derive(Debug, Serialize)]
pub struct ObjectHistoryResponse {
    pub id: ObjectId,
    pub count: usize,
    pub history: Vec<HistoryEntrySummary>,
}

/// Routes returned by `GET /api/cable-routes/`.
#[derive(Debug, Serialize)]
pub struct RouteListResponse {
    pub count: usize,
    pub results: Vec<CableRouteSummary>,
}

/// Build the service router around `state`.
///
/// Health endpoints report this crate's name and version.
pub fn app(state: AppState) -> Router {
    let state = state.with_service(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Router::new()
        .route("/api/map-data/", get(map_data_handler))
        .route("/api/search/", get(search_handler))
        .route("/api/infrastructure/", get(list_handler))
        .route("/api/infrastructure/stats/", get(stats_handler))
        .route(
            "/api/infrastructure/{id}/connected-routes/",
            get(connected_routes_handler),
        )
        .route("/api/infrastructure/{id}/history/", get(history_handler))
        .route("/api/cable-routes/", get(route_list_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Fetch one inventory snapshot on the blocking pool.
async fn snapshot(state: &AppState, request_id: &str) -> Result<Inventory, ProblemDetails> {
    let repository = state.repository();
    match tokio::task::spawn_blocking(move || repository.fetch_inventory()).await {
        Ok(Ok(inventory)) => Ok(inventory),
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "inventory fetch failed");
            Err(from_lib_error(&e, request_id))
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "inventory fetch task failed");
            Err(ProblemDetails::internal_error(
                "Inventory could not be read",
                request_id,
            ))
        }
    }
}

/// Handle GET /api/map-data/ requests.
async fn map_data_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<MapDataRequest>,
) -> Response<MapData> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let filter = match request.to_filter(request_id) {
        Ok(filter) => filter,
        Err(problem) => return Response::Error(*problem),
    };

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    let data = catalog::map_data(&inventory, &filter);
    record_catalog_query("map_data");

    info!(
        request_id = %request_id,
        objects = data.infrastructure_objects.len(),
        routes = data.cable_routes.len(),
        "map data served"
    );

    Response::Success(ServiceResponse::new(data))
}

/// Handle GET /api/search/ requests.
async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<SearchRequest>,
) -> Response<SearchResults> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    if let Err(problem) = request.validate(request_id) {
        return Response::Error(*problem);
    }

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    match catalog::search(&inventory, &request.q) {
        Ok(results) => {
            record_catalog_query("search");
            info!(
                request_id = %request_id,
                query = %request.q,
                total = results.total_results,
                "search completed"
            );
            Response::Success(ServiceResponse::new(results))
        }
        Err(e) => Response::Error(from_lib_error(&e, request_id)),
    }
}

/// Handle GET /api/infrastructure/ requests.
async fn list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<ObjectListRequest>,
) -> Response<ObjectListResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let filter = match request.to_filter(request_id) {
        Ok(filter) => filter,
        Err(problem) => return Response::Error(*problem),
    };

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    let results = catalog::list_objects(&inventory, &filter);
    record_catalog_query("list");

    Response::Success(ServiceResponse::new(ObjectListResponse {
        count: results.len(),
        results,
    }))
}

/// Handle GET /api/infrastructure/stats/ requests.
async fn stats_handler(State(state): State<AppState>, headers: HeaderMap) -> Response<InventoryStats> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    record_catalog_query("stats");
    Response::Success(ServiceResponse::new(catalog::stats(&inventory)))
}

/// Handle GET /api/infrastructure/{id}/connected-routes/ requests.
async fn connected_routes_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response<ConnectedRoutesResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let id = match parse_object_id(&raw_id, request_id) {
        Ok(id) => id,
        Err(problem) => return Response::Error(problem),
    };

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    match catalog::connected_routes(&inventory, id) {
        Ok(cable_routes) => {
            record_catalog_query("connected_routes");
            Response::Success(ServiceResponse::new(ConnectedRoutesResponse {
                id,
                count: cable_routes.len(),
                cable_routes,
            }))
        }
        Err(e) => Response::Error(from_lib_error(&e, request_id)),
    }
}

/// Handle GET /api/infrastructure/{id}/history/ requests.
async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response<ObjectHistoryResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let id = match parse_object_id(&raw_id, request_id) {
        Ok(id) => id,
        Err(problem) => return Response::Error(problem),
    };

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    match catalog::object_history(&inventory, id) {
        Ok(history) => {
            record_catalog_query("history");
            Response::Success(ServiceResponse::new(ObjectHistoryResponse {
                id,
                count: history.len(),
                history,
            }))
        }
        Err(e) => Response::Error(from_lib_error(&e, request_id)),
    }
}

/// Handle GET /api/cable-routes/ requests.
async fn route_list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(request): Query<RouteListRequest>,
) -> Response<RouteListResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let request_id = request_id.as_str();

    let filter = match request.to_filter(request_id) {
        Ok(filter) => filter,
        Err(problem) => return Response::Error(*problem),
    };

    let inventory = match snapshot(&state, request_id).await {
        Ok(inventory) => inventory,
        Err(problem) => return Response::Error(problem),
    };

    let results = catalog::list_routes(&inventory, &filter);
    record_catalog_query("route_list");

    Response::Success(ServiceResponse::new(RouteListResponse {
        count: results.len(),
        results,
    }))
}

/// Non-numeric ids name no object, so they answer 404 like unknown ones.
fn parse_object_id(raw_id: &str, request_id: &str) -> Result<ObjectId, ProblemDetails> {
    raw_id.parse::<ObjectId>().map_err(|_| {
        ProblemDetails::new(
            PROBLEM_OBJECT_NOT_FOUND,
            "Object Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("No infrastructure object with id '{}'", raw_id))
        .with_request_id(request_id)
    })
}
