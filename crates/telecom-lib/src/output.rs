use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::feasibility::{ConnectionQuery, Outcome, Verdict};
use crate::inventory::{
    CableRoute, CableType, HistoryAction, HistoryEntry, InfrastructureObject, Inventory, ObjectId,
    ObjectStatus, ObjectType, RouteType, Technology,
};

/// Serialized view of an infrastructure object.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub object_id: String,
    pub name: String,
    pub object_type: ObjectType,
    pub object_type_display: &'static str,
    pub technology: Option<Technology>,
    pub technology_display: Option<&'static str>,
    pub status: ObjectStatus,
    pub status_display: &'static str,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub capacity: i64,
    pub free_ports: i64,
    pub parent: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    pub technical_notes: String,
    pub installation_date: Option<NaiveDate>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub notes: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children_count: Option<usize>,
}

impl ObjectSummary {
    pub fn from_object(object: &InfrastructureObject) -> Self {
        Self {
            id: object.id,
            object_id: object.object_id.clone(),
            name: object.name.clone(),
            object_type: object.object_type,
            object_type_display: object.object_type.label(),
            technology: object.technology,
            technology_display: object.technology.map(Technology::label),
            status: object.status,
            status_display: object.status.label(),
            address: object.address.clone(),
            lat: object.lat,
            lng: object.lng,
            capacity: object.capacity,
            free_ports: object.free_ports,
            parent: object.parent,
            parent_name: None,
            technical_notes: object.technical_notes.clone(),
            installation_date: object.installation_date,
            last_maintenance: object.last_maintenance,
            next_maintenance: object.next_maintenance,
            notes: object.notes.clone(),
            is_active: object.is_active,
            children_count: None,
        }
    }

    /// Summary enriched with the parent name and child count from `inventory`.
    pub fn with_relations(object: &InfrastructureObject, inventory: &Inventory) -> Self {
        let mut summary = Self::from_object(object);
        summary.parent_name = object
            .parent
            .and_then(|parent| inventory.object_name(parent))
            .map(str::to_string);
        summary.children_count = Some(inventory.children_count(object.id));
        summary
    }
}

/// Serialized view of a cable route with endpoint names resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CableRouteSummary {
    pub id: i64,
    pub name: String,
    pub from_object: ObjectId,
    pub from_object_name: Option<String>,
    pub from_object_type: Option<ObjectType>,
    pub to_object: ObjectId,
    pub to_object_name: Option<String>,
    pub to_object_type: Option<ObjectType>,
    pub cable_type: CableType,
    pub cable_type_display: &'static str,
    pub route_type: RouteType,
    pub route_type_display: &'static str,
    pub length: i64,
    pub fiber_count: i64,
    pub installation_notes: String,
    pub technical_specs: String,
    pub installed_date: Option<NaiveDate>,
    pub tested_date: Option<NaiveDate>,
    pub test_results: String,
    pub notes: String,
    pub is_active: bool,
}

impl CableRouteSummary {
    pub fn from_route(route: &CableRoute, inventory: &Inventory) -> Self {
        let from = inventory.object(route.from_object);
        let to = inventory.object(route.to_object);
        Self {
            id: route.id,
            name: route.name.clone(),
            from_object: route.from_object,
            from_object_name: from.map(|object| object.name.clone()),
            from_object_type: from.map(|object| object.object_type),
            to_object: route.to_object,
            to_object_name: to.map(|object| object.name.clone()),
            to_object_type: to.map(|object| object.object_type),
            cable_type: route.cable_type,
            cable_type_display: route.cable_type.label(),
            route_type: route.route_type,
            route_type_display: route.route_type.label(),
            length: route.length,
            fiber_count: route.fiber_count,
            installation_notes: route.installation_notes.clone(),
            technical_specs: route.technical_specs.clone(),
            installed_date: route.installed_date,
            tested_date: route.tested_date,
            test_results: route.test_results.clone(),
            notes: route.notes.clone(),
            is_active: route.is_active,
        }
    }
}

/// Serialized view of one object history entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryEntrySummary {
    pub id: i64,
    pub infrastructure_object: ObjectId,
    pub action: HistoryAction,
    pub action_display: &'static str,
    pub description: String,
    pub performed_by: String,
    pub performed_date: Option<NaiveDateTime>,
}

impl HistoryEntrySummary {
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id,
            infrastructure_object: entry.object,
            action: entry.action,
            action_display: entry.action.label(),
            description: entry.description.clone(),
            performed_by: entry.performed_by.clone(),
            performed_date: entry.performed_at,
        }
    }
}

/// Availability flag as reported in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Available,
    Unavailable,
}

/// Response payload of a connection-feasibility query.
///
/// `nearest_objects` and `distances` only list in-range candidates; an
/// out-of-range reference object appears in `message` alone.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConnectionReport {
    pub address: String,
    pub status: ConnectionStatus,
    pub technology: Option<&'static str>,
    pub nearest_objects: Vec<ObjectSummary>,
    /// `object_id` to whole meters, truncated toward zero.
    pub distances: BTreeMap<String, u64>,
    pub message: String,
    pub available: bool,
    /// Present (and `true`) only when the default query point was used.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default_point_used: bool,
}

impl ConnectionReport {
    /// Package a verdict into the response contract. Pure formatting.
    pub fn assemble(query: &ConnectionQuery, verdict: &Verdict<'_>) -> Self {
        let available = verdict.available();
        let technology = verdict.technology.map(Technology::label);

        let nearest_objects = verdict
            .in_range
            .iter()
            .map(|candidate| ObjectSummary::from_object(candidate.object))
            .collect();
        let distances = verdict
            .in_range
            .iter()
            .map(|candidate| {
                (
                    candidate.object.object_id.clone(),
                    candidate.truncated_distance_m(),
                )
            })
            .collect();

        Self {
            address: query.address.clone(),
            status: if available {
                ConnectionStatus::Available
            } else {
                ConnectionStatus::Unavailable
            },
            technology,
            nearest_objects,
            distances,
            message: render_message(verdict),
            available,
            default_point_used: query.is_default_point(),
        }
    }
}

fn render_message(verdict: &Verdict<'_>) -> String {
    match (verdict.outcome, verdict.nearest()) {
        (Outcome::InRange, Some(serving)) => format!(
            "✅ Connection AVAILABLE\nNearest point: {name}\nDistance: {distance} m\nTechnology: {technology}\nFree ports: {free}",
            name = serving.object.name,
            distance = serving.truncated_distance_m(),
            technology = verdict.technology.map(Technology::label).unwrap_or("none"),
            free = serving.object.free_ports,
        ),
        (Outcome::OutOfRange, Some(reference)) => format!(
            "❌ Connection NOT AVAILABLE at this location\nNearest point: {name}\nDistance: {distance} m\nNew cable installation required",
            name = reference.object.name,
            distance = reference.truncated_distance_m(),
        ),
        _ => "❌ No connection points available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::{resolve, Candidate};
    use crate::geo::GeoPoint;

    fn query() -> ConnectionQuery {
        ConnectionQuery::new(GeoPoint::new(38.56, 68.78), "Main street 5")
    }

    #[test]
    fn in_range_report_lists_candidates_and_truncates_distances() {
        let gpon = InfrastructureObject::builder(7, "OLT-7")
            .name("Central OLT")
            .technology(Technology::Gpon)
            .ports(64, 5)
            .build();
        let adsl = InfrastructureObject::builder(8, "ATS-8")
            .technology(Technology::Adsl)
            .ports(32, 1)
            .build();
        let verdict = resolve(vec![
            Candidate {
                object: &gpon,
                distance_m: 499.9,
            },
            Candidate {
                object: &adsl,
                distance_m: 1999.5,
            },
        ]);

        let report = ConnectionReport::assemble(&query(), &verdict);
        assert!(report.available);
        assert_eq!(report.status, ConnectionStatus::Available);
        assert_eq!(report.technology, Some("GPON"));
        assert_eq!(report.nearest_objects.len(), 2);
        assert_eq!(report.distances.get("OLT-7"), Some(&499));
        assert_eq!(report.distances.get("ATS-8"), Some(&1999));
        assert_eq!(
            report.message,
            "✅ Connection AVAILABLE\nNearest point: Central OLT\nDistance: 499 m\nTechnology: GPON\nFree ports: 5"
        );
        assert_eq!(report.address, "Main street 5");
    }

    #[test]
    fn out_of_range_report_mentions_reference_only_in_message() {
        let far = InfrastructureObject::builder(3, "SW-3")
            .name("Remote switch")
            .technology(Technology::Ethernet)
            .ports(24, 3)
            .build();
        let verdict = resolve(vec![Candidate {
            object: &far,
            distance_m: 3000.7,
        }]);

        let report = ConnectionReport::assemble(&query(), &verdict);
        assert!(!report.available);
        assert_eq!(report.technology, None);
        assert!(report.nearest_objects.is_empty());
        assert!(report.distances.is_empty());
        assert!(report.message.contains("Remote switch"));
        assert!(report.message.contains("3000 m"));
        assert!(report.message.contains("New cable installation required"));
    }

    #[test]
    fn no_candidate_report_has_distinct_message() {
        let report = ConnectionReport::assemble(&query(), &resolve(Vec::new()));
        assert_eq!(report.message, "❌ No connection points available");
        assert_eq!(report.status, ConnectionStatus::Unavailable);
    }

    #[test]
    fn report_serializes_contract_fields() {
        let report = ConnectionReport::assemble(&query(), &resolve(Vec::new()));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["available"], false);
        assert!(json["technology"].is_null());
        assert!(json["nearest_objects"].as_array().unwrap().is_empty());
        assert!(json["distances"].as_object().unwrap().is_empty());
        assert!(json.get("default_point_used").is_none());
    }

    #[test]
    fn default_point_flag_is_serialized_when_set() {
        let mut query = query();
        query.origin = crate::feasibility::QueryOrigin::DefaultPoint;
        let report = ConnectionReport::assemble(&query, &resolve(Vec::new()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["default_point_used"], true);
    }

    #[test]
    fn object_summary_uses_codes_and_labels() {
        let object = InfrastructureObject::builder(1, "SB-1")
            .object_type(ObjectType::SpliceBox)
            .technology(Technology::Hybrid)
            .build();
        let json = serde_json::to_value(ObjectSummary::from_object(&object)).unwrap();
        assert_eq!(json["object_type"], "splice_box");
        assert_eq!(json["object_type_display"], "Optical Splice Box");
        assert_eq!(json["technology"], "hybrid");
        assert_eq!(json["status"], "active");
        assert!(json.get("children_count").is_none());
    }
}
