//! Query-string request types and validation for HTTP endpoints.
//!
//! Parameters are kept as raw strings so malformed values reach validation
//! (and produce a problem response) instead of failing extraction.

use serde::{Deserialize, Serialize};

use telecom_lib::catalog::MIN_SEARCH_LEN;
use telecom_lib::geo::parse_coordinate;
use telecom_lib::{ConnectionQuery, MapFilter, ObjectFilter, RouteFilter};

use crate::{from_lib_error, ProblemDetails};

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// `GET /api/check-connection/` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConnectionRequest {
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Free-text label echoed back in the response.
    pub address: Option<String>,
}

impl CheckConnectionRequest {
    /// Turn the parameters into an engine query.
    ///
    /// Missing coordinates fall back to the default point only when
    /// `allow_default_point` is set.
    pub fn to_query(
        &self,
        allow_default_point: bool,
        request_id: &str,
    ) -> Result<ConnectionQuery, Box<ProblemDetails>> {
        ConnectionQuery::from_params(
            self.address.as_deref(),
            self.lat.as_deref(),
            self.lng.as_deref(),
            allow_default_point,
        )
        .map_err(|err| Box::new(from_lib_error(&err, request_id)))
    }
}

impl Validate for CheckConnectionRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        for (field, value) in [("lat", &self.lat), ("lng", &self.lng)] {
            if let Some(raw) = value.as_deref().filter(|raw| !raw.is_empty()) {
                parse_coordinate(field, raw)
                    .map_err(|err| Box::new(from_lib_error(&err, request_id)))?;
            }
        }
        Ok(())
    }
}

/// `GET /api/map-data/` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapDataRequest {
    pub object_type: Option<String>,
    pub technology: Option<String>,
}

impl MapDataRequest {
    pub fn to_filter(&self, request_id: &str) -> Result<MapFilter, Box<ProblemDetails>> {
        MapFilter::from_codes(self.object_type.as_deref(), self.technology.as_deref())
            .map_err(|err| Box::new(from_lib_error(&err, request_id)))
    }
}

impl Validate for MapDataRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.to_filter(request_id).map(|_| ())
    }
}

/// `GET /api/search/` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
}

impl Validate for SearchRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.q.chars().count() < MIN_SEARCH_LEN {
            return Err(Box::new(ProblemDetails::bad_request(
                format!(
                    "The 'q' parameter must be at least {} characters long",
                    MIN_SEARCH_LEN
                ),
                request_id,
            )));
        }
        Ok(())
    }
}

/// `GET /api/infrastructure/` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectListRequest {
    pub object_type: Option<String>,
    pub technology: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<String>,
    pub search: Option<String>,
}

impl ObjectListRequest {
    pub fn to_filter(&self, request_id: &str) -> Result<ObjectFilter, Box<ProblemDetails>> {
        ObjectFilter::from_params(
            self.object_type.as_deref(),
            self.technology.as_deref(),
            self.status.as_deref(),
            self.is_active.as_deref(),
            self.search.as_deref(),
        )
        .map_err(|err| Box::new(from_lib_error(&err, request_id)))
    }
}

impl Validate for ObjectListRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.to_filter(request_id).map(|_| ())
    }
}

/// `GET /api/cable-routes/` parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteListRequest {
    pub cable_type: Option<String>,
    pub route_type: Option<String>,
    pub is_active: Option<String>,
}

impl RouteListRequest {
    pub fn to_filter(&self, request_id: &str) -> Result<RouteFilter, Box<ProblemDetails>> {
        RouteFilter::from_params(
            self.cable_type.as_deref(),
            self.route_type.as_deref(),
            self.is_active.as_deref(),
        )
        .map_err(|err| Box::new(from_lib_error(&err, request_id)))
    }
}

impl Validate for RouteListRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.to_filter(request_id).map(|_| ())
    }
}
