//! warden CLI - Access-control reconciliation for the data platform
//!
//! This CLI enables platform operators to:
//! - Preview the corrective actions a scope needs (`warden plan`)
//! - Apply corrective actions against a catalog snapshot (`warden apply`)
//!
//! Scopes are addressed as ENVIRONMENT DATABASE SCHEMA; snapshots are the
//! JSON catalog exports the engine reconciles against.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use error::CliResult;

/// warden CLI - Declarative access-control reconciliation
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview corrective actions for a scope without mutating anything
    Plan(commands::plan::PlanArgs),

    /// Apply corrective actions for a scope
    Apply(commands::apply::ApplyArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args).await,
        Commands::Apply(args) => commands::apply::execute(args).await,
    }
}
