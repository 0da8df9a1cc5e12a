//! Corrective-action execution.
//!
//! Dry run is the pure-preview path: every action stays `Pending` and the
//! catalog is never touched. Apply mode drains the queue strictly in
//! order; a failure on one action never aborts the rest. Duplicate-grant
//! signals on grant statements are classified by structured error code and
//! recorded as no-op successes.

use warden_catalog::{AuthorizationContext, CatalogMutate};

use crate::action::CorrectiveAction;
use crate::types::RunMode;

/// Applies corrective actions against the catalog's mutation API.
pub struct ActionExecutor<'a, C: CatalogMutate> {
    catalog: &'a C,
    authorization: &'a AuthorizationContext,
}

impl<'a, C: CatalogMutate> ActionExecutor<'a, C> {
    /// Create an executor bound to a catalog and an executing identity.
    #[must_use]
    pub fn new(catalog: &'a C, authorization: &'a AuthorizationContext) -> Self {
        Self {
            catalog,
            authorization,
        }
    }

    /// Execute the actions in order, returning them with terminal statuses.
    ///
    /// In [`RunMode::DryRun`] the list is returned untouched. Once apply
    /// mode begins, actions are drained to completion; there is no
    /// cancellation point mid-run.
    pub async fn execute(
        &self,
        mut actions: Vec<CorrectiveAction>,
        mode: RunMode,
    ) -> Vec<CorrectiveAction> {
        if mode == RunMode::DryRun {
            return actions;
        }

        for action in &mut actions {
            let Some(request) = action.request.clone() else {
                // Informational entries surface in the report but carry no
                // mutation.
                continue;
            };

            action.begin();
            match self.catalog.execute(self.authorization, &request).await {
                Ok(()) => {
                    tracing::info!(
                        action_id = %action.id,
                        kind = ?action.kind,
                        target = %action.target,
                        "applied corrective action"
                    );
                    action.succeed();
                }
                Err(e) if e.is_duplicate_grant() && action.kind.duplicate_is_benign() => {
                    tracing::debug!(
                        action_id = %action.id,
                        kind = ?action.kind,
                        target = %action.target,
                        "privilege already granted, treating as no-op"
                    );
                    action.succeed();
                }
                Err(e) => {
                    tracing::warn!(
                        action_id = %action.id,
                        kind = ?action.kind,
                        target = %action.target,
                        error_code = %e.error_code(),
                        error = %e,
                        "corrective action failed"
                    );
                    action.fail(e.error_code(), e.to_string());
                }
            }
        }

        actions
    }
}
