//! Apply corrective actions for a scope against a catalog snapshot

use clap::Args;
use std::path::PathBuf;

use warden_catalog::{AuthorizationContext, SnapshotCatalog};
use warden_core::RoleName;
use warden_reconcile::{ReconcileRequest, ReconciliationEngine, RunMode, RunStatus};

use crate::error::{CliError, CliResult};
use crate::output;

/// Apply corrective actions for a scope
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Environment code (DEV, TST, UAT, PPE, PRD)
    pub environment: String,

    /// Database (data domain) name
    pub database: String,

    /// Schema name
    pub schema: String,

    /// Path to a catalog snapshot file; mutations are written back to it
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Administrative role to execute mutations as
    #[arg(long)]
    pub as_role: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the apply command
pub async fn execute(args: ApplyArgs) -> CliResult<()> {
    let catalog = SnapshotCatalog::load(&args.snapshot)?;
    let engine = ReconciliationEngine::new(
        catalog,
        AuthorizationContext::new(RoleName::new(&args.as_role)),
    );

    let report = engine
        .reconcile(ReconcileRequest::new(
            &args.environment,
            &args.database,
            &args.schema,
            RunMode::Apply,
        ))
        .await;

    // Partial runs still mutated the snapshot; persist whatever applied.
    if report.status != RunStatus::Error || !report.actions.is_empty() {
        engine.catalog().save(&args.snapshot)?;
    }

    output::print_report(&report, args.json)?;

    match report.status {
        RunStatus::Success => Ok(()),
        RunStatus::PartialSuccess => Err(CliError::PartialApply),
        RunStatus::Error => Err(CliError::ReconciliationFailed),
    }
}
