//! In-memory inventory of infrastructure objects and cable routes.
//!
//! Everything in this module is a read-only snapshot: the library never
//! creates, updates or deletes records. Enumerated columns are stored as the
//! lowercase codes used by the admin backend (`gpon`, `splice_box`, ...) and
//! parsed leniently, since the database does not enforce the choice lists.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::geo::GeoPoint;

/// Database record key of an infrastructure object.
pub type ObjectId = i64;

/// Kind of infrastructure object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Olt,
    SpliceBox,
    Splitter,
    Switch,
    Ats,
    Building,
    Client,
    /// Value outside the known choice list.
    Other,
}

impl ObjectType {
    pub const ALL: [ObjectType; 7] = [
        ObjectType::Olt,
        ObjectType::SpliceBox,
        ObjectType::Splitter,
        ObjectType::Switch,
        ObjectType::Ats,
        ObjectType::Building,
        ObjectType::Client,
    ];

    /// Parse a stored code; returns `None` for unknown values.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn code(self) -> &'static str {
        match self {
            ObjectType::Olt => "olt",
            ObjectType::SpliceBox => "splice_box",
            ObjectType::Splitter => "splitter",
            ObjectType::Switch => "switch",
            ObjectType::Ats => "ats",
            ObjectType::Building => "building",
            ObjectType::Client => "client",
            ObjectType::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ObjectType::Olt => "OLT Station",
            ObjectType::SpliceBox => "Optical Splice Box",
            ObjectType::Splitter => "Splitter Box",
            ObjectType::Switch => "Switch",
            ObjectType::Ats => "Telephone Exchange",
            ObjectType::Building => "Building",
            ObjectType::Client => "Client Point",
            ObjectType::Other => "Other",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Access technology offered by an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    Gpon,
    Adsl,
    Ethernet,
    Hybrid,
}

impl Technology {
    pub const ALL: [Technology; 4] = [
        Technology::Gpon,
        Technology::Adsl,
        Technology::Ethernet,
        Technology::Hybrid,
    ];

    /// Parse a stored code. Blank and unknown values yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tech| tech.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn code(self) -> &'static str {
        match self {
            Technology::Gpon => "gpon",
            Technology::Adsl => "adsl",
            Technology::Ethernet => "ethernet",
            Technology::Hybrid => "hybrid",
        }
    }

    /// Name reported to customers, e.g. `GPON`.
    pub fn label(self) -> &'static str {
        match self {
            Technology::Gpon => "GPON",
            Technology::Adsl => "ADSL",
            Technology::Ethernet => "Ethernet",
            Technology::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectStatus {
    #[default]
    Active,
    Planned,
    Inactive,
    Maintenance,
}

impl ObjectStatus {
    pub const ALL: [ObjectStatus; 4] = [
        ObjectStatus::Active,
        ObjectStatus::Planned,
        ObjectStatus::Inactive,
        ObjectStatus::Maintenance,
    ];

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(code.trim()))
    }

    pub fn code(self) -> &'static str {
        match self {
            ObjectStatus::Active => "active",
            ObjectStatus::Planned => "planned",
            ObjectStatus::Inactive => "inactive",
            ObjectStatus::Maintenance => "maintenance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObjectStatus::Active => "Active",
            ObjectStatus::Planned => "Planned",
            ObjectStatus::Inactive => "Inactive",
            ObjectStatus::Maintenance => "Under maintenance",
        }
    }
}

/// A piece of network infrastructure that may serve new connections.
#[derive(Debug, Clone, PartialEq)]
pub struct InfrastructureObject {
    pub id: ObjectId,
    /// Stable business identifier, unique across the inventory.
    pub object_id: String,
    pub name: String,
    pub object_type: ObjectType,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub technology: Option<Technology>,
    pub capacity: i64,
    pub free_ports: i64,
    pub parent: Option<ObjectId>,
    pub technical_notes: String,
    pub installation_date: Option<NaiveDate>,
    pub last_maintenance: Option<NaiveDate>,
    pub next_maintenance: Option<NaiveDate>,
    pub notes: String,
    pub status: ObjectStatus,
    pub is_active: bool,
}

impl InfrastructureObject {
    /// Start building an object with the given record key and identifier.
    pub fn builder(id: ObjectId, object_id: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder::new(id, object_id)
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Active and with at least one free port.
    pub fn is_eligible(&self) -> bool {
        self.is_active && self.free_ports > 0
    }
}

/// Builder for [`InfrastructureObject`] with inventory defaults
/// (active, no technology, zero capacity).
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    object: InfrastructureObject,
}

impl ObjectBuilder {
    pub fn new(id: ObjectId, object_id: impl Into<String>) -> Self {
        let object_id = object_id.into();
        Self {
            object: InfrastructureObject {
                id,
                name: object_id.clone(),
                object_id,
                object_type: ObjectType::Olt,
                address: String::new(),
                lat: 0.0,
                lng: 0.0,
                technology: None,
                capacity: 0,
                free_ports: 0,
                parent: None,
                technical_notes: String::new(),
                installation_date: None,
                last_maintenance: None,
                next_maintenance: None,
                notes: String::new(),
                status: ObjectStatus::Active,
                is_active: true,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.object.name = name.into();
        self
    }

    pub fn object_type(mut self, object_type: ObjectType) -> Self {
        self.object.object_type = object_type;
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.object.address = address.into();
        self
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.object.lat = lat;
        self.object.lng = lng;
        self
    }

    pub fn technology(mut self, technology: Technology) -> Self {
        self.object.technology = Some(technology);
        self
    }

    pub fn ports(mut self, capacity: i64, free_ports: i64) -> Self {
        self.object.capacity = capacity;
        self.object.free_ports = free_ports;
        self
    }

    pub fn parent(mut self, parent: ObjectId) -> Self {
        self.object.parent = Some(parent);
        self
    }

    pub fn technical_notes(mut self, notes: impl Into<String>) -> Self {
        self.object.technical_notes = notes.into();
        self
    }

    pub fn status(mut self, status: ObjectStatus) -> Self {
        self.object.status = status;
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.object.is_active = is_active;
        self
    }

    pub fn build(self) -> InfrastructureObject {
        self.object
    }
}

/// Cable category of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CableType {
    #[default]
    Fiber,
    Copper,
    Hybrid,
}

impl CableType {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fiber" => Some(CableType::Fiber),
            "copper" => Some(CableType::Copper),
            "hybrid" => Some(CableType::Hybrid),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CableType::Fiber => "Fiber optic cable",
            CableType::Copper => "Copper cable",
            CableType::Hybrid => "Hybrid cable",
        }
    }
}

/// How a route is laid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    #[default]
    Underground,
    Aerial,
    Indoor,
}

impl RouteType {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "underground" => Some(RouteType::Underground),
            "aerial" => Some(RouteType::Aerial),
            "indoor" => Some(RouteType::Indoor),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RouteType::Underground => "Underground",
            RouteType::Aerial => "Aerial",
            RouteType::Indoor => "Indoor",
        }
    }
}

/// Cable route between two infrastructure objects.
#[derive(Debug, Clone, PartialEq)]
pub struct CableRoute {
    pub id: i64,
    pub name: String,
    pub from_object: ObjectId,
    pub to_object: ObjectId,
    pub cable_type: CableType,
    pub route_type: RouteType,
    /// Length in meters.
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

impl CableRoute {
    pub fn touches(&self, object: ObjectId) -> bool {
        self.from_object == object || self.to_object == object
    }
}

/// Kind of work recorded in an object's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    #[default]
    Updated,
    Maintenance,
    Repaired,
}

impl HistoryAction {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "created" => Some(HistoryAction::Created),
            "updated" => Some(HistoryAction::Updated),
            "maintenance" => Some(HistoryAction::Maintenance),
            "repaired" => Some(HistoryAction::Repaired),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistoryAction::Created => "Created",
            HistoryAction::Updated => "Updated",
            HistoryAction::Maintenance => "Maintenance",
            HistoryAction::Repaired => "Repair",
        }
    }
}

/// One entry of the work log kept for an infrastructure object.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub object: ObjectId,
    pub action: HistoryAction,
    pub description: String,
    pub performed_by: String,
    pub performed_at: Option<NaiveDateTime>,
}

/// Snapshot of every object, cable route and history entry.
///
/// Objects are kept ordered by `object_id` and routes by `name`, matching the
/// listing order of the admin backend. History is kept newest first; entries
/// without a timestamp go last.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub objects: Vec<InfrastructureObject>,
    pub cable_routes: Vec<CableRoute>,
    pub history: Vec<HistoryEntry>,
}

impl Inventory {
    pub fn new(mut objects: Vec<InfrastructureObject>, mut cable_routes: Vec<CableRoute>) -> Self {
        objects.sort_by(|a, b| a.object_id.cmp(&b.object_id).then(a.id.cmp(&b.id)));
        cable_routes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Self {
            objects,
            cable_routes,
            history: Vec::new(),
        }
    }

    /// Attach history entries to the snapshot.
    pub fn with_history(mut self, mut history: Vec<HistoryEntry>) -> Self {
        // `None` sorts before `Some`, so reversing the comparison puts it last.
        history.sort_by(|a, b| b.performed_at.cmp(&a.performed_at).then(b.id.cmp(&a.id)));
        self.history = history;
        self
    }

    /// History of object `id`, newest first.
    pub fn history_of(&self, id: ObjectId) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().filter(move |entry| entry.object == id)
    }

    /// Lookup an object by record key.
    pub fn object(&self, id: ObjectId) -> Option<&InfrastructureObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_name(&self, id: ObjectId) -> Option<&str> {
        self.object(id).map(|object| object.name.as_str())
    }

    /// Objects currently able to accept a new connection.
    pub fn eligible_objects(&self) -> impl Iterator<Item = &InfrastructureObject> {
        self.objects.iter().filter(|object| object.is_eligible())
    }

    pub fn children_count(&self, id: ObjectId) -> usize {
        self.objects
            .iter()
            .filter(|object| object.parent == Some(id))
            .count()
    }
}
