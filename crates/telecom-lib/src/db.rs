use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OpenFlags, Row};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::inventory::{
    CableRoute, CableType, HistoryAction, HistoryEntry, InfrastructureObject, Inventory,
    ObjectStatus, ObjectType, RouteType, Technology,
};

/// Table layout detected in an inventory database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaLayout {
    /// Tables created by the Django admin backend (`telecom_net_*`).
    Django,
    /// Plain `infrastructure_objects` / `cable_routes` tables.
    Standalone,
}

impl fmt::Display for SchemaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SchemaLayout::Django => "django",
            SchemaLayout::Standalone => "standalone",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SchemaDefinition {
    layout: SchemaLayout,
    objects_table: &'static str,
    routes_table: &'static str,
    history_table: &'static str,
}

impl SchemaLayout {
    fn definition(self) -> SchemaDefinition {
        match self {
            SchemaLayout::Django => SchemaDefinition {
                layout: SchemaLayout::Django,
                objects_table: "telecom_net_infrastructureobject",
                routes_table: "telecom_net_cableroute",
                history_table: "telecom_net_objecthistory",
            },
            SchemaLayout::Standalone => SchemaDefinition {
                layout: SchemaLayout::Standalone,
                objects_table: "infrastructure_objects",
                routes_table: "cable_routes",
                history_table: "object_history",
            },
        }
    }
}

const OBJECT_REQUIRED_COLUMNS: [&str; 7] =
    ["id", "object_id", "name", "lat", "lng", "free_ports", "is_active"];

const OBJECT_OPTIONAL_COLUMNS: [&str; 11] = [
    "object_type",
    "address",
    "technology",
    "capacity",
    "parent_id",
    "technical_notes",
    "installation_date",
    "last_maintenance",
    "next_maintenance",
    "notes",
    "status",
];

const ROUTE_REQUIRED_COLUMNS: [&str; 4] = ["id", "name", "from_object_id", "to_object_id"];

const ROUTE_OPTIONAL_COLUMNS: [&str; 10] = [
    "cable_type",
    "route_type",
    "length",
    "fiber_count",
    "installation_notes",
    "technical_specs",
    "installed_date",
    "tested_date",
    "test_results",
    "notes",
];

const HISTORY_REQUIRED_COLUMNS: [&str; 3] = ["id", "infrastructure_object_id", "action"];

const HISTORY_OPTIONAL_COLUMNS: [&str; 3] = ["description", "performed_by", "performed_date"];

/// Detect which table layout an inventory database uses.
pub fn detect_layout(db_path: &Path) -> Result<SchemaLayout> {
    let connection = open_read_only(db_path)?;
    Ok(detect_schema(&connection)?.layout)
}

/// Load every object, cable route and history entry into memory.
///
/// The loader performs runtime schema detection so both the Django admin
/// tables and the standalone layout are supported. Optional columns that are
/// missing from the table are read as unset. A missing cable route or history
/// table yields an inventory without routes or history.
pub fn load_inventory(db_path: &Path) -> Result<Inventory> {
    let connection = open_read_only(db_path)?;
    let schema = detect_schema(&connection)?;
    read_inventory(&connection, &schema, db_path)
}

/// Load every object, cable route and history entry from a database whose
/// layout is already known.
///
/// Fails with [`Error::UnsupportedSchema`] when the object table of `layout`
/// is gone or lacks a required column.
pub fn load_inventory_with_layout(db_path: &Path, layout: SchemaLayout) -> Result<Inventory> {
    let connection = open_read_only(db_path)?;
    let schema = verify_schema(&connection, layout)?;
    read_inventory(&connection, &schema, db_path)
}

/// Load only active objects with at least one free port from a database
/// whose layout is already known.
///
/// The eligibility filter is pushed down into SQL so the snapshot stays small.
pub fn load_eligible_objects_with_layout(
    db_path: &Path,
    layout: SchemaLayout,
) -> Result<Vec<InfrastructureObject>> {
    let connection = open_read_only(db_path)?;
    let schema = verify_schema(&connection, layout)?;
    load_objects(&connection, &schema, Some(ELIGIBLE_FILTER))
}

const ELIGIBLE_FILTER: &str = "o.is_active <> 0 AND o.free_ports > 0";

fn read_inventory(
    connection: &Connection,
    schema: &SchemaDefinition,
    db_path: &Path,
) -> Result<Inventory> {
    debug!(layout = %schema.layout, path = %db_path.display(), "loading inventory");

    let objects = load_objects(connection, schema, None)?;
    let cable_routes = if table_exists(connection, schema.routes_table)? {
        load_cable_routes(connection, schema)?
    } else {
        debug!(table = schema.routes_table, "cable route table absent");
        Vec::new()
    };
    let history = if table_exists(connection, schema.history_table)? {
        load_history(connection, schema)?
    } else {
        debug!(table = schema.history_table, "object history table absent");
        Vec::new()
    };

    Ok(Inventory::new(objects, cable_routes).with_history(history))
}

fn open_read_only(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        return Err(Error::DatasetNotFound {
            path: db_path.to_path_buf(),
        });
    }
    let connection = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(connection)
}

fn detect_schema(connection: &Connection) -> Result<SchemaDefinition> {
    for layout in [SchemaLayout::Django, SchemaLayout::Standalone] {
        let schema = layout.definition();
        if objects_table_usable(connection, &schema)? {
            return Ok(schema);
        }
    }

    Err(Error::UnsupportedSchema)
}

fn verify_schema(connection: &Connection, layout: SchemaLayout) -> Result<SchemaDefinition> {
    let schema = layout.definition();
    if objects_table_usable(connection, &schema)? {
        Ok(schema)
    } else {
        warn!(layout = %layout, table = schema.objects_table, "object table no longer matches layout");
        Err(Error::UnsupportedSchema)
    }
}

fn objects_table_usable(connection: &Connection, schema: &SchemaDefinition) -> Result<bool> {
    Ok(table_exists(connection, schema.objects_table)?
        && table_has_columns(connection, schema.objects_table, &OBJECT_REQUIRED_COLUMNS)?)
}

fn select_list(
    connection: &Connection,
    table: &str,
    required: &[&str],
    optional: &[&str],
) -> Result<Vec<String>> {
    let mut selects: Vec<String> = required
        .iter()
        .map(|column| format!("o.{column} AS {column}"))
        .collect();

    for column in optional {
        if table_has_columns(connection, table, &[column])? {
            selects.push(format!("o.{column} AS {column}"));
        } else {
            selects.push(format!("NULL AS {column}"));
        }
    }
    Ok(selects)
}

fn load_objects(
    connection: &Connection,
    schema: &SchemaDefinition,
    filter: Option<&str>,
) -> Result<Vec<InfrastructureObject>> {
    let selects = select_list(
        connection,
        schema.objects_table,
        &OBJECT_REQUIRED_COLUMNS,
        &OBJECT_OPTIONAL_COLUMNS,
    )?;

    let mut sql = format!(
        "SELECT {selects} FROM {table} o",
        selects = selects.join(", "),
        table = schema.objects_table
    );
    if let Some(filter) = filter {
        sql.push_str(" WHERE ");
        sql.push_str(filter);
    }
    sql.push_str(" ORDER BY o.object_id, o.id");

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_object)?;

    let mut objects = Vec::new();
    for entry in rows {
        objects.push(entry?);
    }
    Ok(objects)
}

fn load_cable_routes(connection: &Connection, schema: &SchemaDefinition) -> Result<Vec<CableRoute>> {
    if !table_has_columns(connection, schema.routes_table, &ROUTE_REQUIRED_COLUMNS)? {
        warn!(
            table = schema.routes_table,
            "cable route table lacks required columns; ignoring routes"
        );
        return Ok(Vec::new());
    }

    let mut selects = select_list(
        connection,
        schema.routes_table,
        &ROUTE_REQUIRED_COLUMNS,
        &ROUTE_OPTIONAL_COLUMNS,
    )?;
    if table_has_columns(connection, schema.routes_table, &["is_active"])? {
        selects.push("o.is_active AS is_active".to_string());
    } else {
        selects.push("1 AS is_active".to_string());
    }

    let sql = format!(
        "SELECT {selects} FROM {table} o ORDER BY o.name, o.id",
        selects = selects.join(", "),
        table = schema.routes_table
    );

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_cable_route)?;

    let mut routes = Vec::new();
    for entry in rows {
        routes.push(entry?);
    }
    Ok(routes)
}

fn load_history(connection: &Connection, schema: &SchemaDefinition) -> Result<Vec<HistoryEntry>> {
    if !table_has_columns(connection, schema.history_table, &HISTORY_REQUIRED_COLUMNS)? {
        warn!(
            table = schema.history_table,
            "object history table lacks required columns; ignoring history"
        );
        return Ok(Vec::new());
    }

    let selects = select_list(
        connection,
        schema.history_table,
        &HISTORY_REQUIRED_COLUMNS,
        &HISTORY_OPTIONAL_COLUMNS,
    )?;
    let sql = format!(
        "SELECT {selects} FROM {table} o",
        selects = selects.join(", "),
        table = schema.history_table
    );

    let mut stmt = connection.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_history_entry)?;

    let mut history = Vec::new();
    for entry in rows {
        history.push(entry?);
    }
    Ok(history)
}

fn row_to_object(row: &Row<'_>) -> rusqlite::Result<InfrastructureObject> {
    let id: i64 = row.get("id")?;
    let object_type = match row.get::<_, Option<String>>("object_type")? {
        Some(code) => ObjectType::parse(&code).unwrap_or_else(|| {
            warn!(id, code = %code, "unknown object type");
            ObjectType::Other
        }),
        None => ObjectType::Other,
    };
    let technology = row
        .get::<_, Option<String>>("technology")?
        .and_then(|code| {
            let parsed = Technology::parse(&code);
            if parsed.is_none() && !code.trim().is_empty() {
                warn!(id, code = %code, "unknown technology; treating as unset");
            }
            parsed
        });
    let status = match row.get::<_, Option<String>>("status")? {
        Some(code) => ObjectStatus::parse(&code).unwrap_or_else(|| {
            warn!(id, code = %code, "unknown object status; assuming active");
            ObjectStatus::Active
        }),
        None => ObjectStatus::Active,
    };

    Ok(InfrastructureObject {
        id,
        object_id: row.get("object_id")?,
        name: row.get("name")?,
        object_type,
        address: text_or_empty(row, "address")?,
        lat: row.get("lat")?,
        lng: row.get("lng")?,
        technology,
        capacity: row.get::<_, Option<i64>>("capacity")?.unwrap_or(0),
        free_ports: row.get("free_ports")?,
        parent: row.get("parent_id")?,
        technical_notes: text_or_empty(row, "technical_notes")?,
        installation_date: date_column(row, "installation_date")?,
        last_maintenance: date_column(row, "last_maintenance")?,
        next_maintenance: date_column(row, "next_maintenance")?,
        notes: text_or_empty(row, "notes")?,
        status,
        is_active: row.get("is_active")?,
    })
}

fn row_to_cable_route(row: &Row<'_>) -> rusqlite::Result<CableRoute> {
    let cable_type = row
        .get::<_, Option<String>>("cable_type")?
        .and_then(|code| CableType::parse(&code))
        .unwrap_or_default();
    let route_type = row
        .get::<_, Option<String>>("route_type")?
        .and_then(|code| RouteType::parse(&code))
        .unwrap_or_default();

    Ok(CableRoute {
        id: row.get("id")?,
        name: row.get("name")?,
        from_object: row.get("from_object_id")?,
        to_object: row.get("to_object_id")?,
        cable_type,
        route_type,
        length: row.get::<_, Option<i64>>("length")?.unwrap_or(0),
        fiber_count: row.get::<_, Option<i64>>("fiber_count")?.unwrap_or(1),
        installation_notes: text_or_empty(row, "installation_notes")?,
        technical_specs: text_or_empty(row, "technical_specs")?,
        installed_date: date_column(row, "installed_date")?,
        tested_date: date_column(row, "tested_date")?,
        test_results: text_or_empty(row, "test_results")?,
        notes: text_or_empty(row, "notes")?,
        is_active: row.get("is_active")?,
    })
}

fn row_to_history_entry(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let id: i64 = row.get("id")?;
    let action = match row.get::<_, Option<String>>("action")? {
        Some(code) => HistoryAction::parse(&code).unwrap_or_else(|| {
            warn!(id, code = %code, "unknown history action; treating as update");
            HistoryAction::Updated
        }),
        None => HistoryAction::Updated,
    };

    Ok(HistoryEntry {
        id,
        object: row.get("infrastructure_object_id")?,
        action,
        description: text_or_empty(row, "description")?,
        performed_by: text_or_empty(row, "performed_by")?,
        performed_at: datetime_column(row, "performed_date")?,
    })
}

fn text_or_empty(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

/// Read an ISO `YYYY-MM-DD` date column; unparseable values become `None`.
fn date_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let Some(raw) = row.get::<_, Option<String>>(column)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    // Datetime values keep only their date part.
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            warn!(column, value = %raw, "ignoring unparseable date");
            Ok(None)
        }
    }
}

/// Read a `YYYY-MM-DD HH:MM:SS` timestamp column, ignoring fractional seconds
/// and any timezone suffix. A bare date reads as midnight.
fn datetime_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let Some(raw) = row.get::<_, Option<String>>(column)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let stamp = trimmed.get(..19).unwrap_or(trimmed).replacen('T', " ", 1);
    let parsed = NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%d %H:%M:%S").or_else(|_| {
        NaiveDate::parse_from_str(&stamp, "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN))
    });
    match parsed {
        Ok(stamp) => Ok(Some(stamp)),
        Err(_) => {
            warn!(column, value = %raw, "ignoring unparseable timestamp");
            Ok(None)
        }
    }
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}
