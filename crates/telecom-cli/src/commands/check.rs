//! Check command handler for connection feasibility.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use telecom_lib::{check_connection, ConnectionQuery};

use crate::output::{emit, render_report, OutputFormat};

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Latitude of the subscriber location.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,
    /// Longitude of the subscriber location.
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<String>,
    /// Free-text address echoed in the report.
    #[arg(long)]
    pub address: Option<String>,
    /// Fail instead of checking the default query point when coordinates are missing.
    #[arg(long)]
    pub no_default_point: bool,
}

/// Handle the check subcommand.
pub fn handle_check(database: &Path, format: OutputFormat, args: &CheckArgs) -> Result<()> {
    let query = ConnectionQuery::from_params(
        args.address.as_deref(),
        args.lat.as_deref(),
        args.lng.as_deref(),
        !args.no_default_point,
    )
    .context("invalid query location")?;

    let repository = super::open_repository(database)?;
    let report = check_connection(&repository, &query)
        .with_context(|| format!("failed to check connection using {}", database.display()))?;

    emit(format, &report, render_report)
}
