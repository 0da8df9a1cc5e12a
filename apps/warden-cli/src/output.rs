//! Report rendering for terminal and JSON output

use warden_reconcile::{ActionStatus, ReconciliationReport, RunMode, RunStatus};

use crate::error::CliResult;

/// Print a reconciliation report, as pretty JSON or human-readable text.
pub fn print_report(report: &ReconciliationReport, json: bool) -> CliResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("{}", render(report));
    Ok(())
}

fn render(report: &ReconciliationReport) -> String {
    let mut out = String::new();

    let heading = match report.mode {
        RunMode::DryRun => "Reconciliation plan",
        RunMode::Apply => "Reconciliation run",
    };
    out.push_str(&format!(
        "{heading} for {}.{}.{}\n",
        report.environment, report.database, report.schema
    ));

    if let Some(roles) = &report.roles {
        out.push_str(&format!("  read group:  {}\n", roles.read));
        if let Some(write) = &roles.write {
            out.push_str(&format!("  write group: {}\n", write));
        }
        out.push_str(&format!("  owner:       {}\n", roles.owner));
    }

    if report.actions.is_empty() && report.errors.is_empty() {
        out.push_str("\nNothing to correct. Scope matches the mandated topology.\n");
    }

    if !report.actions.is_empty() {
        out.push('\n');
        for (index, action) in report.actions.iter().enumerate() {
            let detail = action.note.as_deref().unwrap_or("");
            out.push_str(&format!(
                "  {:>3}. [{}] {:<26} {}{}\n",
                index + 1,
                status_marker(action.status),
                action.kind.token(),
                action.target,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!("  ({detail})")
                },
            ));
        }
    }

    if !report.errors.is_empty() {
        out.push_str("\nErrors:\n");
        for error in &report.errors {
            out.push_str(&format!("  - {error}\n"));
        }
    }

    let failed = report
        .actions
        .iter()
        .filter(|a| a.status == ActionStatus::Failure)
        .count();
    out.push_str(&format!(
        "\nStatus: {} ({} actions, {} failed)\n",
        status_label(report.status),
        report.actions.len(),
        failed
    ));
    out
}

fn status_marker(status: ActionStatus) -> &'static str {
    match status {
        ActionStatus::Pending => " ",
        ActionStatus::Executing => ">",
        ActionStatus::Success => "ok",
        ActionStatus::Failure => "FAILED",
    }
}

fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Success => "SUCCESS",
        RunStatus::PartialSuccess => "PARTIAL_SUCCESS",
        RunStatus::Error => "ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use warden_core::{naming, Environment, Scope};
    use warden_reconcile::{desired_topology, diff, ActualTopology};

    fn plan_report() -> ReconciliationReport {
        let scope = Scope::new(Environment::Dev, "HR", "EMPLOYEES").unwrap();
        let actions = diff(&desired_topology(&scope), &ActualTopology::new(false));
        ReconciliationReport::summarize(
            RunMode::DryRun,
            "DEV",
            "HR",
            "EMPLOYEES",
            naming::schema_groups(&scope),
            actions,
            Utc::now(),
        )
    }

    #[test]
    fn test_render_lists_actions_and_status() {
        let text = render(&plan_report());
        assert!(text.contains("Reconciliation plan for DEV.HR.EMPLOYEES"));
        assert!(text.contains("CREATE_ROLE"));
        assert!(text.contains("DEV_HR_EMPLOYEES_READ"));
        assert!(text.contains("Status: SUCCESS"));
    }

    #[test]
    fn test_render_empty_plan_reports_converged() {
        let scope = Scope::new(Environment::Dev, "HR", "EMPLOYEES").unwrap();
        let report = ReconciliationReport::summarize(
            RunMode::DryRun,
            "DEV",
            "HR",
            "EMPLOYEES",
            naming::schema_groups(&scope),
            Vec::new(),
            Utc::now(),
        );
        assert!(render(&report).contains("Nothing to correct"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let json = serde_json::to_string_pretty(&plan_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["mode"], "dry_run");
    }
}
