//! Output formatting for command results.
//!
//! Every command renders either a human-readable text block or the same
//! payload the HTTP services return, as pretty-printed JSON.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use telecom_lib::{CableRouteSummary, ConnectionReport, InventoryStats, MapData, SearchResults};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render `value` in the requested format and print it to stdout.
pub fn emit<T, F>(format: OutputFormat, value: &T, render_text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let rendered = match format {
        OutputFormat::Text => render_text(value),
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("failed to serialize output")?
        }
    };
    println!("{}", rendered);
    Ok(())
}

/// Connection report as text: the verdict message followed by the in-range
/// objects.
pub fn render_report(report: &ConnectionReport) -> String {
    let mut out = String::new();
    if !report.address.is_empty() {
        let _ = writeln!(out, "Address: {}", report.address);
    }
    if report.default_point_used {
        out.push_str("Note: no coordinates given; checked the default query point\n");
    }
    out.push_str(&report.message);

    if !report.nearest_objects.is_empty() {
        out.push_str("\n\nIn range:");
        for object in &report.nearest_objects {
            let distance = report.distances.get(&object.object_id).copied().unwrap_or(0);
            let _ = write!(
                out,
                "\n  {:<12} {:<28} {:>5} m  {:>4} free",
                object.object_id, object.name, distance, object.free_ports
            );
        }
    }
    out
}

pub fn render_search(results: &SearchResults) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Objects ({}):", results.infrastructure_objects.len());
    for object in &results.infrastructure_objects {
        let _ = writeln!(out, "  {:<12} {} ({})", object.object_id, object.name, object.address);
    }
    let _ = writeln!(out, "Cable routes ({}):", results.cable_routes.len());
    for route in &results.cable_routes {
        let _ = writeln!(out, "  {}", route_line(route));
    }
    let _ = write!(out, "Total results: {}", results.total_results);
    out
}

pub fn render_stats(stats: &InventoryStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total objects:  {}", stats.total_objects);
    let _ = writeln!(out, "Active objects: {}", stats.active_objects);

    for (title, counts) in [
        ("By type", &stats.objects_by_type),
        ("By technology", &stats.objects_by_technology),
        ("By status", &stats.objects_by_status),
    ] {
        let _ = writeln!(out, "{}:", title);
        for (code, count) in counts {
            let _ = writeln!(out, "  {:<14} {}", code, count);
        }
    }

    let _ = writeln!(out, "Total capacity:   {}", stats.total_capacity);
    let _ = writeln!(out, "Total free ports: {}", stats.total_free_ports);
    let _ = write!(out, "Free port rate:   {:.2}%", stats.utilization_rate);
    out
}

pub fn render_map_data(data: &MapData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Objects ({}):", data.infrastructure_objects.len());
    for object in &data.infrastructure_objects {
        let _ = writeln!(
            out,
            "  {:<12} {:<28} {:>10.6} {:>10.6}  {}",
            object.object_id,
            object.name,
            object.lat,
            object.lng,
            object.technology_display.unwrap_or("-")
        );
    }
    let _ = write!(out, "Cable routes ({}):", data.cable_routes.len());
    for route in &data.cable_routes {
        let _ = write!(out, "\n  {}", route_line(route));
    }
    out
}

fn route_line(route: &CableRouteSummary) -> String {
    format!(
        "{} ({} -> {}, {} m)",
        route.name,
        route.from_object_name.as_deref().unwrap_or("<unknown>"),
        route.to_object_name.as_deref().unwrap_or("<unknown>"),
        route.length
    )
}
