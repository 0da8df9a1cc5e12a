//! Result envelope assembly.
//!
//! The caller always receives a structured envelope, never a raw error.
//! An empty action list with status `success` means nothing needed fixing;
//! derived role names are included even when the run stops early, so
//! operators can act on them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use warden_core::SchemaGroups;

use crate::action::CorrectiveAction;
use crate::types::{RunMode, RunStatus};

/// The result envelope for one reconciliation invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    /// Overall outcome.
    pub status: RunStatus,
    /// Mode the run executed under.
    pub mode: RunMode,
    /// Environment code the run targeted.
    pub environment: String,
    /// Database (data domain) name.
    pub database: String,
    /// Schema name.
    pub schema: String,
    /// Derived canonical role names; absent only when scope validation
    /// failed before names could be derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<SchemaGroups>,
    /// Ordered corrective actions with their terminal statuses.
    pub actions: Vec<CorrectiveAction>,
    /// Validation, precondition, and per-action error messages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the envelope was assembled.
    pub completed_at: DateTime<Utc>,
}

impl ReconciliationReport {
    /// Assemble the envelope for a run that reached execution.
    #[must_use]
    pub fn summarize(
        mode: RunMode,
        environment: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
        roles: SchemaGroups,
        actions: Vec<CorrectiveAction>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let succeeded = actions.iter().filter(|a| a.is_success()).count();
        let failed = actions.iter().filter(|a| a.is_failure()).count();

        let status = if failed == 0 {
            RunStatus::Success
        } else if succeeded > 0 {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Error
        };

        let errors = actions
            .iter()
            .filter_map(|action| {
                action
                    .error
                    .as_ref()
                    .map(|e| format!("{}: {} ({})", action.target, e.message, e.code))
            })
            .collect();

        Self {
            status,
            mode,
            environment: environment.into(),
            database: database.into(),
            schema: schema.into(),
            roles: Some(roles),
            actions,
            errors,
            started_at,
            completed_at: Utc::now(),
        }
    }

    /// Assemble a terminal-error envelope for a run stopped by validation
    /// or inspection.
    #[must_use]
    pub fn rejected(
        mode: RunMode,
        environment: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
        roles: Option<SchemaGroups>,
        error: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: RunStatus::Error,
            mode,
            environment: environment.into(),
            database: database.into(),
            schema: schema.into(),
            roles,
            actions: Vec::new(),
            errors: vec![error.into()],
            started_at,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;
    use warden_catalog::MutationRequest;
    use warden_core::{naming, Environment, RoleName, Scope};

    fn groups() -> SchemaGroups {
        naming::schema_groups(&Scope::new(Environment::Dev, "HR", "EMPLOYEES").unwrap())
    }

    fn action(role: &str) -> CorrectiveAction {
        CorrectiveAction::new(
            ActionKind::CreateRole,
            role,
            MutationRequest::CreateRole {
                role: RoleName::new(role),
            },
        )
    }

    fn executed(role: &str, ok: bool) -> CorrectiveAction {
        let mut action = action(role);
        action.begin();
        if ok {
            action.succeed();
        } else {
            action.fail("STATEMENT_FAILED", "injected");
        }
        action
    }

    fn summarize(actions: Vec<CorrectiveAction>) -> ReconciliationReport {
        ReconciliationReport::summarize(
            RunMode::Apply,
            "DEV",
            "HR",
            "EMPLOYEES",
            groups(),
            actions,
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_action_list_is_success() {
        let report = summarize(Vec::new());
        assert_eq!(report.status, RunStatus::Success);
        assert!(report.actions.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_all_success_is_success() {
        let report = summarize(vec![executed("A", true), executed("B", true)]);
        assert_eq!(report.status, RunStatus::Success);
    }

    #[test]
    fn test_mixed_outcome_is_partial_success() {
        let report = summarize(vec![executed("A", true), executed("B", false)]);
        assert_eq!(report.status, RunStatus::PartialSuccess);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("STATEMENT_FAILED"));
    }

    #[test]
    fn test_nothing_applied_is_error() {
        let report = summarize(vec![executed("A", false)]);
        assert_eq!(report.status, RunStatus::Error);
    }

    #[test]
    fn test_rejected_has_empty_actions_and_message() {
        let report = ReconciliationReport::rejected(
            RunMode::DryRun,
            "UAT",
            "FIN",
            "FINANCE",
            None,
            "schema FIN.FINANCE does not exist",
            Utc::now(),
        );
        assert_eq!(report.status, RunStatus::Error);
        assert!(report.actions.is_empty());
        assert!(report.errors[0].contains("FINANCE"));
    }

    #[test]
    fn test_envelope_serializes_derived_roles() {
        let report = summarize(Vec::new());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("DEV_HR_EMPLOYEES_READ"));
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"mode\":\"apply\""));
    }
}
