//! Corrective actions.
//!
//! One action is one atomic, independently-failable step toward the
//! desired topology. Actions are created by the differ, mutated only by
//! the executor, and immutable once their status is terminal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use warden_catalog::MutationRequest;

use crate::types::{ActionKind, ActionStatus};

/// Structured error detail attached to a failed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionError {
    /// Catalog error code (e.g. `STATEMENT_FAILED`).
    pub code: String,
    /// Catalog-supplied error message.
    pub message: String,
}

/// One corrective action.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectiveAction {
    /// Action id, for correlating log lines with report entries.
    pub id: Uuid,
    /// What kind of work this performs.
    pub kind: ActionKind,
    /// The identifier the action targets (role name, or `DB.SCHEMA` for
    /// managed-access toggles).
    pub target: String,
    /// The typed mutation to execute; `None` for informational entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<MutationRequest>,
    /// Free-form operator note; only set on informational entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Current status.
    pub status: ActionStatus,
    /// Error detail if the action failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
    /// When the action reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
}

impl CorrectiveAction {
    /// Create a pending action carrying a mutation.
    #[must_use]
    pub fn new(kind: ActionKind, target: impl Into<String>, request: MutationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            target: target.into(),
            request: Some(request),
            note: None,
            status: ActionStatus::Pending,
            error: None,
            executed_at: None,
        }
    }

    /// Create an informational entry that is surfaced but never executed.
    #[must_use]
    pub fn notice(target: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ActionKind::Notice,
            target: target.into(),
            request: None,
            note: Some(note.into()),
            status: ActionStatus::Pending,
            error: None,
            executed_at: None,
        }
    }

    /// Transition `Pending → Executing`.
    pub fn begin(&mut self) {
        debug_assert_eq!(self.status, ActionStatus::Pending);
        self.status = ActionStatus::Executing;
    }

    /// Transition `Executing → Success`.
    pub fn succeed(&mut self) {
        debug_assert_eq!(self.status, ActionStatus::Executing);
        self.status = ActionStatus::Success;
        self.executed_at = Some(Utc::now());
    }

    /// Transition `Executing → Failure`, recording the catalog error.
    pub fn fail(&mut self, code: impl Into<String>, message: impl Into<String>) {
        debug_assert_eq!(self.status, ActionStatus::Executing);
        self.status = ActionStatus::Failure;
        self.error = Some(ActionError {
            code: code.into(),
            message: message.into(),
        });
        self.executed_at = Some(Utc::now());
    }

    /// Whether the action reached `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    /// Whether the action reached `Failure`.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status == ActionStatus::Failure
    }
}
