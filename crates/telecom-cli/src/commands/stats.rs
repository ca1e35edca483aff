//! Stats command handler.

use std::path::Path;

use anyhow::Result;

use telecom_lib::catalog;

use crate::output::{emit, render_stats, OutputFormat};

/// Handle the stats subcommand.
pub fn handle_stats(database: &Path, format: OutputFormat) -> Result<()> {
    let inventory = super::load_snapshot(database)?;
    emit(format, &catalog::stats(&inventory), render_stats)
}
