//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Provides structured error responses following the Problem Details standard.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>
//!
//! Besides the standard members every problem carries `error` (a short,
//! stable code) and `message` (human-readable text), which existing map
//! clients read.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use telecom_lib::Error as LibError;

/// Problem type URI for malformed or missing coordinates.
pub const PROBLEM_INVALID_COORDINATES: &str = "/problems/invalid-coordinates";

/// Problem type URI for infrastructure objects that do not exist.
pub const PROBLEM_OBJECT_NOT_FOUND: &str = "/problems/object-not-found";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Problem type URI for an unreachable or unreadable inventory.
pub const PROBLEM_SERVICE_UNAVAILABLE: &str = "/problems/service-unavailable";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use telecom_service_shared::{ProblemDetails, PROBLEM_OBJECT_NOT_FOUND};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(
///     PROBLEM_OBJECT_NOT_FOUND,
///     "Object Not Found",
///     StatusCode::NOT_FOUND,
/// )
/// .with_detail("infrastructure object 42 not found")
/// .with_request_id("req-12345");
/// assert_eq!(problem.error, "object-not-found");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying the specific occurrence (e.g., request ID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Stable error code, the last segment of the type URI.
    pub error: String,

    /// Human-readable message; the detail when present, otherwise the title.
    pub message: String,

    /// Content type for this response (always "application/problem+json").
    pub content_type: String,
}

impl ProblemDetails {
    /// Create a new ProblemDetails with required fields.
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        let type_uri = type_uri.into();
        let title = title.into();
        let error = type_uri
            .rsplit('/')
            .next()
            .unwrap_or(type_uri.as_str())
            .to_string();
        Self {
            message: title.clone(),
            type_uri,
            title,
            status: status.as_u16(),
            detail: None,
            instance: None,
            error,
            content_type: "application/problem+json".to_string(),
        }
    }

    /// Add a detailed explanation of this specific problem occurrence.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.message = detail.clone();
        self.detail = Some(detail);
        self
    }

    /// Add the request identifier for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// Create a 400 Bad Request problem for invalid input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 400 Bad Request problem for unusable coordinates.
    pub fn invalid_coordinates(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_COORDINATES,
            "Invalid Coordinates",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 404 Not Found problem for an unknown object record id.
    pub fn object_not_found(id: i64, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_OBJECT_NOT_FOUND,
            "Object Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!("Infrastructure object {} not found", id))
        .with_request_id(request_id)
    }

    /// Create a 500 Internal Server Error problem.
    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// Create a 503 Service Unavailable problem.
    pub fn service_unavailable(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_SERVICE_UNAVAILABLE,
            "Service Unavailable",
            StatusCode::SERVICE_UNAVAILABLE,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.title,
            self.detail.as_deref().unwrap_or("")
        )
    }
}

impl std::error::Error for ProblemDetails {}

/// Implement IntoResponse for axum to return ProblemDetails as HTTP responses.
impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        *response.status_mut() = status;
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// Caller errors map to 400, unknown objects to 404 and every repository
/// failure to 503. The `request_id` must be provided separately since library
/// errors don't have it.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidCoordinate { .. } | LibError::MissingCoordinates => {
            ProblemDetails::invalid_coordinates(error.to_string(), request_id)
        }
        LibError::InvalidFilter { .. } | LibError::QueryTooShort { .. } => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        LibError::ObjectNotFound { id } => ProblemDetails::object_not_found(*id, request_id),
        LibError::DatasetNotFound { path } => ProblemDetails::service_unavailable(
            format!("Inventory not available at {}", path.display()),
            request_id,
        ),
        LibError::UnsupportedSchema => {
            ProblemDetails::service_unavailable("Unsupported inventory schema", request_id)
        }
        LibError::Sqlite(_) | LibError::Io(_) => ProblemDetails::service_unavailable(
            format!("Inventory could not be read: {}", error),
            request_id,
        ),
    }
}
