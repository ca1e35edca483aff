//! Read-only catalog queries over an inventory snapshot.
//!
//! These back the map view, the search box, the dashboard statistics and the
//! object listing. All functions are pure over an [`Inventory`]; callers fetch
//! the snapshot from an [`ObjectRepository`](crate::repository::ObjectRepository).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::inventory::{
    CableRoute, CableType, InfrastructureObject, Inventory, ObjectId, ObjectStatus, ObjectType,
    RouteType, Technology,
};
use crate::output::{CableRouteSummary, HistoryEntrySummary, ObjectSummary};

/// Minimum number of characters accepted by [`search`].
pub const MIN_SEARCH_LEN: usize = 2;

/// Maximum number of objects returned by [`search`].
pub const SEARCH_OBJECT_LIMIT: usize = 20;

/// Maximum number of cable routes returned by [`search`].
pub const SEARCH_ROUTE_LIMIT: usize = 10;

/// Filter applied to the map layer. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapFilter {
    pub object_type: Option<ObjectType>,
    pub technology: Option<Technology>,
}

impl MapFilter {
    /// Build a filter from raw query-string codes; blank values are ignored.
    pub fn from_codes(object_type: Option<&str>, technology: Option<&str>) -> Result<Self> {
        Ok(Self {
            object_type: parse_code("object_type", object_type, ObjectType::parse)?,
            technology: parse_code("technology", technology, Technology::parse)?,
        })
    }

    fn matches(&self, object: &InfrastructureObject) -> bool {
        self.object_type.is_none_or(|kind| object.object_type == kind)
            && self
                .technology
                .is_none_or(|tech| object.technology == Some(tech))
    }
}

/// Filter applied to the full object listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectFilter {
    pub object_type: Option<ObjectType>,
    pub technology: Option<Technology>,
    pub status: Option<ObjectStatus>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring matched against identifier, name, address
    /// and both note fields.
    pub search: Option<String>,
}

impl ObjectFilter {
    /// Build a filter from raw query-string values.
    ///
    /// `is_active` is true only for a case-insensitive `"true"`; any other
    /// supplied value selects inactive objects.
    pub fn from_params(
        object_type: Option<&str>,
        technology: Option<&str>,
        status: Option<&str>,
        is_active: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            object_type: parse_code("object_type", object_type, ObjectType::parse)?,
            technology: parse_code("technology", technology, Technology::parse)?,
            status: parse_code("status", status, ObjectStatus::parse)?,
            is_active: is_active.map(|raw| raw.eq_ignore_ascii_case("true")),
            search: search.filter(|term| !term.is_empty()).map(str::to_string),
        })
    }

    fn matches(&self, object: &InfrastructureObject) -> bool {
        if self.object_type.is_some_and(|kind| object.object_type != kind)
            || self
                .technology
                .is_some_and(|tech| object.technology != Some(tech))
            || self.status.is_some_and(|status| object.status != status)
            || self.is_active.is_some_and(|active| object.is_active != active)
        {
            return false;
        }

        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                [
                    &object.object_id,
                    &object.name,
                    &object.address,
                    &object.technical_notes,
                    &object.notes,
                ]
                .into_iter()
                .any(|field| contains_folded(field, &needle))
            }
            None => true,
        }
    }
}

/// Filter applied to the cable route listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFilter {
    pub cable_type: Option<CableType>,
    pub route_type: Option<RouteType>,
    pub is_active: Option<bool>,
}

impl RouteFilter {
    /// Build a filter from raw query-string values.
    ///
    /// `is_active` follows the same rule as [`ObjectFilter::from_params`].
    pub fn from_params(
        cable_type: Option<&str>,
        route_type: Option<&str>,
        is_active: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            cable_type: parse_code("cable_type", cable_type, CableType::parse)?,
            route_type: parse_code("route_type", route_type, RouteType::parse)?,
            is_active: is_active.map(|raw| raw.eq_ignore_ascii_case("true")),
        })
    }

    fn matches(&self, route: &CableRoute) -> bool {
        self.cable_type.is_none_or(|kind| route.cable_type == kind)
            && self.route_type.is_none_or(|kind| route.route_type == kind)
            && self.is_active.is_none_or(|active| route.is_active == active)
    }
}

fn parse_code<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse(value).map(Some).ok_or_else(|| Error::InvalidFilter {
            field,
            value: value.to_string(),
        }),
        None => Ok(None),
    }
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Objects and routes drawn on the network map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapData {
    pub infrastructure_objects: Vec<ObjectSummary>,
    pub cable_routes: Vec<CableRouteSummary>,
}

/// Active objects matching `filter` together with every active cable route.
pub fn map_data(inventory: &Inventory, filter: &MapFilter) -> MapData {
    let infrastructure_objects = inventory
        .objects
        .iter()
        .filter(|object| object.is_active && filter.matches(object))
        .map(|object| ObjectSummary::with_relations(object, inventory))
        .collect();

    MapData {
        infrastructure_objects,
        cable_routes: active_routes(inventory, |_| true),
    }
}

/// Result of a free-text search.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResults {
    pub infrastructure_objects: Vec<ObjectSummary>,
    pub cable_routes: Vec<CableRouteSummary>,
    pub total_results: usize,
}

/// Case-insensitive substring search over active objects and routes.
///
/// Objects match on `object_id`, `name`, `address` or `technical_notes`;
/// routes on `name`, `installation_notes` or `notes`. Results are capped at
/// [`SEARCH_OBJECT_LIMIT`] objects and [`SEARCH_ROUTE_LIMIT`] routes.
pub fn search(inventory: &Inventory, query: &str) -> Result<SearchResults> {
    if query.chars().count() < MIN_SEARCH_LEN {
        return Err(Error::QueryTooShort {
            min: MIN_SEARCH_LEN,
        });
    }
    let needle = query.to_lowercase();

    let infrastructure_objects: Vec<ObjectSummary> = inventory
        .objects
        .iter()
        .filter(|object| object.is_active)
        .filter(|object| {
            [
                &object.object_id,
                &object.name,
                &object.address,
                &object.technical_notes,
            ]
            .into_iter()
            .any(|field| contains_folded(field, &needle))
        })
        .take(SEARCH_OBJECT_LIMIT)
        .map(|object| ObjectSummary::with_relations(object, inventory))
        .collect();

    let mut cable_routes = active_routes(inventory, |route| {
        [&route.name, &route.installation_notes, &route.notes]
            .into_iter()
            .any(|field| contains_folded(field, &needle))
    });
    cable_routes.truncate(SEARCH_ROUTE_LIMIT);

    let total_results = infrastructure_objects.len() + cable_routes.len();
    Ok(SearchResults {
        infrastructure_objects,
        cable_routes,
        total_results,
    })
}

/// Objects matching `filter`, ordered by `object_id`.
pub fn list_objects(inventory: &Inventory, filter: &ObjectFilter) -> Vec<ObjectSummary> {
    inventory
        .objects
        .iter()
        .filter(|object| filter.matches(object))
        .map(|object| ObjectSummary::with_relations(object, inventory))
        .collect()
}

/// Active cable routes starting or ending at object `id`.
pub fn connected_routes(inventory: &Inventory, id: ObjectId) -> Result<Vec<CableRouteSummary>> {
    if inventory.object(id).is_none() {
        return Err(Error::ObjectNotFound { id });
    }
    Ok(active_routes(inventory, |route| route.touches(id)))
}

/// Cable routes matching `filter`, active or not, ordered by name.
pub fn list_routes(inventory: &Inventory, filter: &RouteFilter) -> Vec<CableRouteSummary> {
    inventory
        .cable_routes
        .iter()
        .filter(|route| filter.matches(route))
        .map(|route| CableRouteSummary::from_route(route, inventory))
        .collect()
}

/// Work log of object `id`, newest first.
pub fn object_history(inventory: &Inventory, id: ObjectId) -> Result<Vec<HistoryEntrySummary>> {
    if inventory.object(id).is_none() {
        return Err(Error::ObjectNotFound { id });
    }
    Ok(inventory
        .history_of(id)
        .map(HistoryEntrySummary::from_entry)
        .collect())
}

fn active_routes<F>(inventory: &Inventory, predicate: F) -> Vec<CableRouteSummary>
where
    F: Fn(&CableRoute) -> bool,
{
    inventory
        .cable_routes
        .iter()
        .filter(|route| route.is_active && predicate(route))
        .map(|route| CableRouteSummary::from_route(route, inventory))
        .collect()
}

/// Aggregate statistics over every object, active or not.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InventoryStats {
    pub total_objects: usize,
    pub active_objects: usize,
    pub objects_by_type: BTreeMap<String, usize>,
    /// Keyed by technology code; objects without one count under `"none"`.
    pub objects_by_technology: BTreeMap<String, usize>,
    pub objects_by_status: BTreeMap<String, usize>,
    pub total_capacity: i64,
    pub total_free_ports: i64,
    /// Free ports as a percentage of capacity, rounded to two decimals.
    pub utilization_rate: f64,
}

pub fn stats(inventory: &Inventory) -> InventoryStats {
    let mut objects_by_type = BTreeMap::new();
    let mut objects_by_technology = BTreeMap::new();
    let mut objects_by_status = BTreeMap::new();
    let mut total_capacity = 0i64;
    let mut total_free_ports = 0i64;

    for object in &inventory.objects {
        *objects_by_type
            .entry(object.object_type.code().to_string())
            .or_insert(0) += 1;
        let technology = object.technology.map_or("none", Technology::code);
        *objects_by_technology
            .entry(technology.to_string())
            .or_insert(0) += 1;
        *objects_by_status
            .entry(object.status.code().to_string())
            .or_insert(0) += 1;
        total_capacity += object.capacity;
        total_free_ports += object.free_ports;
    }

    InventoryStats {
        total_objects: inventory.objects.len(),
        active_objects: inventory.objects.iter().filter(|o| o.is_active).count(),
        objects_by_type,
        objects_by_technology,
        objects_by_status,
        total_capacity,
        total_free_ports,
        utilization_rate: utilization_rate(total_free_ports, total_capacity),
    }
}

fn utilization_rate(free_ports: i64, capacity: i64) -> f64 {
    let capacity = if capacity == 0 { 1 } else { capacity };
    let rate = free_ports as f64 / capacity as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
