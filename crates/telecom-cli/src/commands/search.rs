//! Search command handler.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use telecom_lib::catalog;

use crate::output::{emit, render_search, OutputFormat};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text matched case-insensitively against ids, names, addresses and notes.
    pub query: String,
}

/// Handle the search subcommand.
pub fn handle_search(database: &Path, format: OutputFormat, args: &SearchArgs) -> Result<()> {
    let inventory = super::load_snapshot(database)?;
    let results = catalog::search(&inventory, &args.query)?;
    emit(format, &results, render_search)
}
