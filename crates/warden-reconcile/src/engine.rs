//! Reconciliation engine orchestrator.
//!
//! Single entry point: validate the scope, inspect the catalog, generate
//! desired state, diff, execute, summarize. Steps run strictly
//! sequentially within one invocation; the engine holds no process-wide
//! state, so concurrent invocations across scopes are fully independent.
//! Concurrent invocations against the same scope are not synchronized
//! here; safety relies on catalog-level idempotence.

use chrono::Utc;
use std::str::FromStr;

use warden_catalog::{AuthorizationContext, CatalogMutate, CatalogRead, CatalogResult};
use warden_core::{naming, Environment, Result as CoreResult, Scope};

use crate::desired::{desired_topology, DesiredTopology};
use crate::differ::{diff, ActualTopology};
use crate::executor::ActionExecutor;
use crate::report::ReconciliationReport;
use crate::types::RunMode;

/// One reconciliation invocation.
///
/// Raw operator input; the engine validates it and never propagates a raw
/// error past the top level.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    /// Environment code (DEV, TST, UAT, PPE, PRD).
    pub environment: String,
    /// Database (data domain) name.
    pub database: String,
    /// Schema name.
    pub schema: String,
    /// Dry run unless explicitly applied.
    pub mode: RunMode,
}

impl ReconcileRequest {
    /// Build a request from raw operator input.
    #[must_use]
    pub fn new(
        environment: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
        mode: RunMode,
    ) -> Self {
        Self {
            environment: environment.into(),
            database: database.into(),
            schema: schema.into(),
            mode,
        }
    }
}

/// The reconciliation engine.
pub struct ReconciliationEngine<C> {
    catalog: C,
    authorization: AuthorizationContext,
}

impl<C: CatalogRead + CatalogMutate> ReconciliationEngine<C> {
    /// Create an engine over a catalog, executing as an explicit identity.
    #[must_use]
    pub fn new(catalog: C, authorization: AuthorizationContext) -> Self {
        Self {
            catalog,
            authorization,
        }
    }

    /// The catalog this engine operates on.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Run one reconciliation and return the result envelope.
    pub async fn reconcile(&self, request: ReconcileRequest) -> ReconciliationReport {
        let started_at = Utc::now();
        tracing::info!(
            environment = %request.environment,
            database = %request.database,
            schema = %request.schema,
            mode = %request.mode,
            "starting reconciliation"
        );

        // Validation errors are terminal, before any catalog access.
        let scope = match validate(&request) {
            Ok(scope) => scope,
            Err(e) => {
                return ReconciliationReport::rejected(
                    request.mode,
                    request.environment,
                    request.database,
                    request.schema,
                    None,
                    e.to_string(),
                    started_at,
                );
            }
        };
        let groups = naming::schema_groups(&scope);

        // Precondition: nothing is reconcilable beneath a missing schema.
        match self.catalog.schema_exists(&scope).await {
            Ok(true) => {}
            Ok(false) => {
                return ReconciliationReport::rejected(
                    request.mode,
                    scope.environment().code(),
                    scope.database(),
                    scope.schema(),
                    Some(groups),
                    format!(
                        "schema {}.{} does not exist in {}",
                        scope.database(),
                        scope.schema(),
                        scope.environment()
                    ),
                    started_at,
                );
            }
            Err(e) => {
                return ReconciliationReport::rejected(
                    request.mode,
                    scope.environment().code(),
                    scope.database(),
                    scope.schema(),
                    Some(groups),
                    format!("catalog inspection failed: {e}"),
                    started_at,
                );
            }
        }

        let desired = desired_topology(&scope);
        let actual = match self.inspect(&scope, &desired).await {
            Ok(actual) => actual,
            Err(e) => {
                return ReconciliationReport::rejected(
                    request.mode,
                    scope.environment().code(),
                    scope.database(),
                    scope.schema(),
                    Some(groups),
                    format!("catalog inspection failed: {e}"),
                    started_at,
                );
            }
        };

        let actions = diff(&desired, &actual);
        let executor = ActionExecutor::new(&self.catalog, &self.authorization);
        let actions = executor.execute(actions, request.mode).await;

        let report = ReconciliationReport::summarize(
            request.mode,
            scope.environment().code(),
            scope.database(),
            scope.schema(),
            groups,
            actions,
            started_at,
        );
        tracing::info!(
            scope = %scope,
            status = %report.status,
            actions = report.actions.len(),
            failures = report.errors.len(),
            "reconciliation finished"
        );
        report
    }

    /// Read the observable topology for the desired nodes.
    async fn inspect(
        &self,
        scope: &Scope,
        desired: &DesiredTopology,
    ) -> CatalogResult<ActualTopology> {
        let managed = self.catalog.is_managed_access(scope).await?;
        let mut actual = ActualTopology::new(managed);
        for node in &desired.nodes {
            if self.catalog.role_exists(&node.role).await? {
                actual = actual.with_role(&node.role);
            }
        }
        Ok(actual)
    }
}

fn validate(request: &ReconcileRequest) -> CoreResult<Scope> {
    let environment = Environment::from_str(&request.environment)?;
    Scope::new(environment, &request.database, &request.schema)
}
