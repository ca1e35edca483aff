//! Map data command handler.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use telecom_lib::{catalog, MapFilter};

use crate::output::{emit, render_map_data, OutputFormat};

#[derive(Args, Debug, Default)]
pub struct MapDataArgs {
    /// Only include objects of this type (olt, splice_box, splitter, switch, ats, building, client).
    #[arg(long)]
    pub object_type: Option<String>,
    /// Only include objects using this technology (gpon, adsl, ethernet, hybrid).
    #[arg(long)]
    pub technology: Option<String>,
}

/// Handle the map-data subcommand.
pub fn handle_map_data(database: &Path, format: OutputFormat, args: &MapDataArgs) -> Result<()> {
    let filter = MapFilter::from_codes(args.object_type.as_deref(), args.technology.as_deref())?;
    let inventory = super::load_snapshot(database)?;
    emit(format, &catalog::map_data(&inventory, &filter), render_map_data)
}
