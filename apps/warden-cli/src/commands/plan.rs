//! Preview the corrective actions for a scope without applying them

use clap::Args;
use std::path::PathBuf;

use warden_catalog::{AuthorizationContext, SnapshotCatalog};
use warden_core::RoleName;
use warden_reconcile::{ReconcileRequest, ReconciliationEngine, RunMode, RunStatus};

use crate::error::{CliError, CliResult};
use crate::output;

/// Preview corrective actions for a scope
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Environment code (DEV, TST, UAT, PPE, PRD)
    pub environment: String,

    /// Database (data domain) name
    pub database: String,

    /// Schema name
    pub schema: String,

    /// Path to a catalog snapshot file
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Role the plan would execute as
    #[arg(long, default_value = "SECURITY_ADMIN")]
    pub as_role: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the plan command
pub async fn execute(args: PlanArgs) -> CliResult<()> {
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
            RunMode::DryRun,
        ))
        .await;

    output::print_report(&report, args.json)?;

    match report.status {
        // A plan full of pending actions is still a successful plan.
        RunStatus::Success | RunStatus::PartialSuccess => Ok(()),
        RunStatus::Error => Err(CliError::ReconciliationFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_catalog::SnapshotState;

    #[tokio::test]
    async fn test_plan_leaves_snapshot_file_untouched() {
        let state = SnapshotState::new()
            .with_schema("HR", "EMPLOYEES", false)
            .with_role("DEV_HR_DEVELOPER")
            .with_administrator("SECURITY_ADMIN");
        let json = serde_json::to_string(&state).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), &json).unwrap();

        execute(PlanArgs {
            environment: "DEV".to_string(),
            database: "HR".to_string(),
            schema: "EMPLOYEES".to_string(),
            snapshot: file.path().to_path_buf(),
            as_role: "SECURITY_ADMIN".to_string(),
            json: true,
        })
        .await
        .unwrap();

        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), json);
    }

    #[tokio::test]
    async fn test_plan_invalid_environment_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{}").unwrap();

        let err = execute(PlanArgs {
            environment: "QA".to_string(),
            database: "HR".to_string(),
            schema: "EMPLOYEES".to_string(),
            snapshot: file.path().to_path_buf(),
            as_role: "SECURITY_ADMIN".to_string(),
            json: true,
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::ReconciliationFailed));
    }
}
