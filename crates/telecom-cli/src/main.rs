use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use telecom_cli::commands::check::{handle_check, CheckArgs};
use telecom_cli::commands::map_data::{handle_map_data, MapDataArgs};
use telecom_cli::commands::search::{handle_search, SearchArgs};
use telecom_cli::commands::stats::handle_stats;
use telecom_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Telecom infrastructure inventory utilities")]
struct Cli {
    /// Path to the inventory database.
    #[arg(long, env = "TELECOM_DATA_PATH")]
    database: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a new connection is feasible at a location.
    Check(CheckArgs),
    /// Search objects and cable routes by free text.
    Search(SearchArgs),
    /// Print inventory statistics.
    Stats,
    /// Print the objects and cable routes drawn on the network map.
    MapData(MapDataArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let database = cli
        .database
        .context("no inventory database given; pass --database or set TELECOM_DATA_PATH")?;

    match &cli.command {
        Command::Check(args) => handle_check(&database, cli.format, args),
        Command::Search(args) => handle_search(&database, cli.format, args),
        Command::Stats => handle_stats(&database, cli.format),
        Command::MapData(args) => handle_map_data(&database, cli.format, args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
