//! Reconciliation run and action vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Execution mode for a reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Compute and report the plan without mutating the catalog. The safe
    /// default.
    #[default]
    DryRun,
    /// Apply the plan against the catalog.
    Apply,
}

impl Display for RunMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::DryRun => f.write_str("dry_run"),
            RunMode::Apply => f.write_str("apply"),
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dry_run" => Ok(RunMode::DryRun),
            "apply" => Ok(RunMode::Apply),
            other => Err(format!("unknown run mode: {other}")),
        }
    }
}

/// Overall outcome of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No action failed.
    Success,
    /// At least one action succeeded and at least one failed.
    PartialSuccess,
    /// The run could not proceed past validation or inspection, or nothing
    /// at all was applied.
    Error,
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => f.write_str("success"),
            RunStatus::PartialSuccess => f.write_str("partial_success"),
            RunStatus::Error => f.write_str("error"),
        }
    }
}

/// The kind of corrective work one action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Toggle the schema to managed access.
    EnableManagedAccess,
    /// Create a role or permission-group node.
    CreateRole,
    /// Grant a privilege set on one object category.
    GrantPrivilegeSet,
    /// Move ownership of existing objects of one category.
    TransferOwnership,
    /// Route ownership of future objects of one category.
    ConfigureFutureOwnership,
    /// Grant create privileges on the schema.
    GrantCreatePrivileges,
    /// Cross-cutting usage grant for the operations role.
    GrantCrossRoleUsage,
    /// Informational entry for the operator; never executed.
    Notice,
}

impl ActionKind {
    /// Whether a duplicate-state failure on this kind is a benign re-run
    /// artefact. Grant statements are; creates and toggles are not, since
    /// the differ would not have emitted them for an existing entity.
    #[must_use]
    pub fn duplicate_is_benign(&self) -> bool {
        matches!(
            self,
            ActionKind::GrantPrivilegeSet
                | ActionKind::GrantCreatePrivileges
                | ActionKind::GrantCrossRoleUsage
        )
    }

    /// Whether this kind carries no mutation at all.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        matches!(self, ActionKind::Notice)
    }

    /// Canonical upper-case token, matching the serialized form.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            ActionKind::EnableManagedAccess => "ENABLE_MANAGED_ACCESS",
            ActionKind::CreateRole => "CREATE_ROLE",
            ActionKind::GrantPrivilegeSet => "GRANT_PRIVILEGE_SET",
            ActionKind::TransferOwnership => "TRANSFER_OWNERSHIP",
            ActionKind::ConfigureFutureOwnership => "CONFIGURE_FUTURE_OWNERSHIP",
            ActionKind::GrantCreatePrivileges => "GRANT_CREATE_PRIVILEGES",
            ActionKind::GrantCrossRoleUsage => "GRANT_CROSS_ROLE_USAGE",
            ActionKind::Notice => "NOTICE",
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Status of one corrective action.
///
/// `Pending → Executing → {Success | Failure}`; terminal states are never
/// revisited within one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    /// Queued, or never executed (dry run / informational).
    #[default]
    Pending,
    /// Mutation in flight.
    Executing,
    /// Mutation applied, or benign duplicate swallowed.
    Success,
    /// Mutation failed; error detail recorded on the action.
    Failure,
}

impl ActionStatus {
    /// Whether this status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionStatus::Success | ActionStatus::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_default_is_dry_run() {
        assert_eq!(RunMode::default(), RunMode::DryRun);
    }

    #[test]
    fn test_run_mode_round_trip() {
        for mode in [RunMode::DryRun, RunMode::Apply] {
            let parsed: RunMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_benign_duplicate_kinds() {
        assert!(ActionKind::GrantPrivilegeSet.duplicate_is_benign());
        assert!(ActionKind::GrantCreatePrivileges.duplicate_is_benign());
        assert!(ActionKind::GrantCrossRoleUsage.duplicate_is_benign());
        assert!(!ActionKind::CreateRole.duplicate_is_benign());
        assert!(!ActionKind::EnableManagedAccess.duplicate_is_benign());
        assert!(!ActionKind::TransferOwnership.duplicate_is_benign());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!ActionStatus::Pending.is_terminal());
        assert!(!ActionStatus::Executing.is_terminal());
        assert!(ActionStatus::Success.is_terminal());
        assert!(ActionStatus::Failure.is_terminal());
    }

    #[test]
    fn test_action_kind_serializes_screaming() {
        let json = serde_json::to_string(&ActionKind::EnableManagedAccess).unwrap();
        assert_eq!(json, "\"ENABLE_MANAGED_ACCESS\"");
    }
}
