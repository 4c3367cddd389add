//! Tally — keyed record-keeping CLI.
//!
//! # Usage
//!
//! ```text
//! tally [--data-dir DIR] [--format json|yaml] [-v] warehouse seed|list|add-electronic|add-grocery|increase|set|remove
//! tally [...] health seed|patients|add-patient|prescribe|history <patient>
//! tally [...] inventory list|add|update|delete
//! tally [...] finance seed|record|account|list [--category <name>]
//! ```
//!
//! Each invocation loads the domain's snapshots, runs one verb, and saves
//! again if the verb changed anything.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tally_core::Format;

use commands::{
    finance::FinanceCommand, health::HealthCommand, inventory::InventoryCommand,
    warehouse::WarehouseCommand,
};
use config::Config;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Keep warehouse, health, inventory and finance records on disk",
    long_about = None,
)]
struct Cli {
    /// Directory holding the snapshot documents. Defaults to ~/.tally.
    #[arg(long, env = "TALLY_HOME", global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Snapshot format: json | yaml.
    #[arg(long, env = "TALLY_FORMAT", global = true, default_value_t = Format::Json)]
    format: Format,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Electronics and grocery stock.
    Warehouse {
        #[command(subcommand)]
        command: WarehouseCommand,
    },

    /// Patients and prescriptions.
    Health {
        #[command(subcommand)]
        command: HealthCommand,
    },

    /// Free-form inventory log.
    Inventory {
        #[command(subcommand)]
        command: InventoryCommand,
    },

    /// Savings account and its transactions.
    Finance {
        #[command(subcommand)]
        command: FinanceCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::resolve(cli.data_dir, cli.format)?;
    tracing::debug!(data_dir = %config.data_dir.display(), format = %config.format, "config resolved");

    match cli.command {
        Commands::Warehouse { command } => commands::warehouse::run(command, &config),
        Commands::Health { command } => commands::health::run(command, &config),
        Commands::Inventory { command } => commands::inventory::run(command, &config),
        Commands::Finance { command } => commands::finance::run(command, &config),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
