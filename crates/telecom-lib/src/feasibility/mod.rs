//! Connection-feasibility engine.
//!
//! Answers one question: can new service be connected at a given coordinate,
//! and if so, from which object and with what technology? A query runs in a
//! single pass over a snapshot fetched from an [`ObjectRepository`]:
//!
//! ```text
//! query point ─► rank (filter eligible, distance, sort, cap 10)
//!             ─► resolve (2000 m radius, serving object, technology)
//!             ─► ConnectionReport::assemble (response payload + message)
//! ```
//!
//! The policy constants below are part of the external contract: consumers
//! depend on the literal radius, candidate cap and technology priority.

mod ranker;
mod resolver;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geo::{parse_coordinate, GeoPoint};
use crate::inventory::{InfrastructureObject, Technology};
use crate::output::ConnectionReport;
use crate::repository::ObjectRepository;

pub use ranker::rank;
pub use resolver::{resolve, resolve_technology, Outcome, Verdict};

/// Maximum number of ranked candidates kept per query.
pub const MAX_CANDIDATES: usize = 10;

/// Service radius in meters. A candidate exactly on the boundary is in range.
pub const SERVICE_RADIUS_M: f64 = 2000.0;

/// Technologies reported in order of preference when present in range.
pub const TECHNOLOGY_PRIORITY: [Technology; 2] = [Technology::Gpon, Technology::Adsl];

/// Reported when in-range objects carry technologies but none in
/// [`TECHNOLOGY_PRIORITY`].
pub const FALLBACK_TECHNOLOGY: Technology = Technology::Ethernet;

/// Point substituted when a caller omits coordinates (Dushanbe city centre).
pub const DEFAULT_QUERY_POINT: GeoPoint = GeoPoint::new(38.56, 68.78);

/// An eligible object paired with its distance from the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub object: &'a InfrastructureObject,
    pub distance_m: f64,
}

impl Candidate<'_> {
    /// Distance truncated toward zero to whole meters.
    pub fn truncated_distance_m(&self) -> u64 {
        self.distance_m.trunc() as u64
    }
}

/// Where the coordinates of a query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrigin {
    /// Coordinates were supplied by the caller.
    Supplied,
    /// Coordinates were omitted and [`DEFAULT_QUERY_POINT`] was used.
    DefaultPoint,
}

/// A single feasibility query.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionQuery {
    pub point: GeoPoint,
    /// Free-text label echoed in the response; never used for matching.
    pub address: String,
    pub origin: QueryOrigin,
}

impl ConnectionQuery {
    pub fn new(point: GeoPoint, address: impl Into<String>) -> Self {
        Self {
            point,
            address: address.into(),
            origin: QueryOrigin::Supplied,
        }
    }

    /// Build a query from raw request parameters.
    ///
    /// When `lat` or `lng` is missing or empty, the query falls back to
    /// [`DEFAULT_QUERY_POINT`] if `allow_default_point` is set, and fails with
    /// [`Error::MissingCoordinates`] otherwise. Supplied values that are not
    /// finite numbers fail with [`Error::InvalidCoordinate`].
    pub fn from_params(
        address: Option<&str>,
        lat: Option<&str>,
        lng: Option<&str>,
        allow_default_point: bool,
    ) -> Result<Self> {
        let address = address.unwrap_or_default().to_string();
        let lat = lat.filter(|value| !value.is_empty());
        let lng = lng.filter(|value| !value.is_empty());

        match (lat, lng) {
            (Some(lat), Some(lng)) => {
                let point = GeoPoint::new(
                    parse_coordinate("lat", lat)?,
                    parse_coordinate("lng", lng)?,
                );
                Ok(Self::new(point, address))
            }
            _ if allow_default_point => {
                warn!(
                    lat = DEFAULT_QUERY_POINT.lat,
                    lng = DEFAULT_QUERY_POINT.lng,
                    "coordinates missing; substituting default query point"
                );
                Ok(Self {
                    point: DEFAULT_QUERY_POINT,
                    address,
                    origin: QueryOrigin::DefaultPoint,
                })
            }
            _ => Err(Error::MissingCoordinates),
        }
    }

    pub fn is_default_point(&self) -> bool {
        self.origin == QueryOrigin::DefaultPoint
    }
}

/// Rank and resolve a snapshot without touching a repository.
pub fn evaluate<'a, I>(point: GeoPoint, objects: I) -> Verdict<'a>
where
    I: IntoIterator<Item = &'a InfrastructureObject>,
{
    resolve(rank(point, objects))
}

/// Check whether a connection is feasible at the query point.
///
/// Fetches one snapshot from `repository`, then ranks, resolves and assembles
/// the report. Repository failures are returned unchanged; no retry is made.
pub fn check_connection<R>(repository: &R, query: &ConnectionQuery) -> Result<ConnectionReport>
where
    R: ObjectRepository + ?Sized,
{
    let objects = repository.fetch_active_with_free_capacity()?;
    let verdict = evaluate(query.point, &objects);

    debug!(
        lat = query.point.lat,
        lng = query.point.lng,
        origin = ?query.origin,
        eligible = objects.len(),
        ranked = verdict.ranked.len(),
        in_range = verdict.in_range.len(),
        outcome = verdict.outcome.as_str(),
        "connection feasibility resolved"
    );

    Ok(ConnectionReport::assemble(query, &verdict))
}
