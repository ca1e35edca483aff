//! Response wrapper for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Successful payload with its content type, mirroring `ProblemDetails`.
///
/// The payload is flattened, so a wrapped `ConnectionReport` keeps `status`,
/// `available`, `message` and friends at the top level.
///
/// # Example
///
/// ```
/// use telecom_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     total_objects: usize,
/// }
///
/// let response = ServiceResponse::new(Summary { total_objects: 42 });
/// assert_eq!(response.content_type, "application/json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
