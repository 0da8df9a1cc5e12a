//! Snapshot-backed catalog
//!
//! A catalog implementation over an exported state snapshot. Operators run
//! `warden plan` against a snapshot exported from the live catalog;
//! integration tests drive the full engine against it. Duplicate-state
//! semantics mirror the live catalog: re-creating an existing entity is an
//! error, re-granting an existing privilege signals `ALREADY_GRANTED`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use warden_core::{RoleName, Scope};

use crate::error::{CatalogError, CatalogResult};
use crate::mutation::{AuthorizationContext, ContainerLevel, MutationRequest, ObjectCategory, Privilege};
use crate::traits::{CatalogMutate, CatalogRead};

/// One schema entry in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Whether managed access is enabled.
    #[serde(default)]
    pub managed_access: bool,
}

/// Serializable catalog state.
///
/// Keys are canonical upper-case identifiers; schemas are keyed as
/// `DATABASE.SCHEMA`. `BTree` collections keep snapshot files diffable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    /// Schemas present in the catalog.
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaEntry>,
    /// Role nodes present in the catalog.
    #[serde(default)]
    pub roles: BTreeSet<String>,
    /// Roles permitted to execute mutations.
    #[serde(default)]
    pub administrators: BTreeSet<String>,
    /// Grant keys already applied.
    #[serde(default)]
    pub grants: BTreeSet<String>,
    /// Current object ownership per `DATABASE.SCHEMA.CATEGORY`.
    #[serde(default)]
    pub ownership: BTreeMap<String, String>,
    /// Future-object ownership routing per `DATABASE.SCHEMA.CATEGORY`.
    #[serde(default)]
    pub future_ownership: BTreeMap<String, String>,
}

impl SnapshotState {
    /// Empty catalog state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema.
    #[must_use]
    pub fn with_schema(mut self, database: &str, schema: &str, managed_access: bool) -> Self {
        self.schemas
            .insert(schema_key(database, schema), SchemaEntry { managed_access });
        self
    }

    /// Add a role node.
    #[must_use]
    pub fn with_role(mut self, role: &str) -> Self {
        self.roles.insert(role.to_string());
        self
    }

    /// Add an administrative role allowed to execute mutations.
    #[must_use]
    pub fn with_administrator(mut self, role: &str) -> Self {
        self.administrators.insert(role.to_string());
        self
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role) || self.administrators.contains(role)
    }

    fn has_database(&self, database: &str) -> bool {
        let prefix = format!("{database}.");
        self.schemas.keys().any(|k| k.starts_with(&prefix))
    }
}

/// Catalog over an in-memory [`SnapshotState`].
pub struct SnapshotCatalog {
    state: Mutex<SnapshotState>,
}

impl SnapshotCatalog {
    /// Wrap an existing state.
    #[must_use]
    pub fn new(state: SnapshotState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let state: SnapshotState = serde_json::from_str(json).map_err(|e| CatalogError::Snapshot {
            message: format!("invalid snapshot: {e}"),
        })?;
        Ok(Self::new(state))
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::Snapshot {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }

    /// Persist the current state to a snapshot file.
    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let state = self.lock()?.clone();
        let json = serde_json::to_string_pretty(&state).map_err(|e| CatalogError::Snapshot {
            message: format!("cannot serialize snapshot: {e}"),
        })?;
        std::fs::write(path, json).map_err(|e| CatalogError::Snapshot {
            message: format!("cannot write {}: {e}", path.display()),
        })
    }

    /// Clone the current state, for persistence or purity assertions.
    pub fn state(&self) -> CatalogResult<SnapshotState> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> CatalogResult<std::sync::MutexGuard<'_, SnapshotState>> {
        self.state
            .lock()
            .map_err(|_| CatalogError::internal("snapshot state poisoned"))
    }
}

#[async_trait]
impl CatalogRead for SnapshotCatalog {
    async fn schema_exists(&self, scope: &Scope) -> CatalogResult<bool> {
        let state = self.lock()?;
        Ok(state
            .schemas
            .contains_key(&schema_key(scope.database(), scope.schema())))
    }

    async fn is_managed_access(&self, scope: &Scope) -> CatalogResult<bool> {
        let state = self.lock()?;
        Ok(state
            .schemas
            .get(&schema_key(scope.database(), scope.schema()))
            .is_some_and(|entry| entry.managed_access))
    }

    async fn role_exists(&self, role: &RoleName) -> CatalogResult<bool> {
        let state = self.lock()?;
        Ok(state.has_role(role.as_str()))
    }
}

#[async_trait]
impl CatalogMutate for SnapshotCatalog {
    async fn execute(
        &self,
        authorization: &AuthorizationContext,
        request: &MutationRequest,
    ) -> CatalogResult<()> {
        let mut state = self.lock()?;

        if !state.administrators.contains(authorization.role().as_str()) {
            return Err(CatalogError::Authorization {
                role: authorization.role().to_string(),
                message: "role is not a catalog administrator".to_string(),
            });
        }

        match request {
            MutationRequest::EnableManagedAccess { database, schema } => {
                let entry = state.schemas.get_mut(&schema_key(database, schema)).ok_or(
                    CatalogError::SchemaNotFound {
                        database: database.clone(),
                        schema: schema.clone(),
                    },
                )?;
                if entry.managed_access {
                    return Err(CatalogError::AlreadyExists {
                        identifier: format!("managed access on {database}.{schema}"),
                    });
                }
                entry.managed_access = true;
                Ok(())
            }
            MutationRequest::CreateRole { role } => {
                if state.has_role(role.as_str()) {
                    return Err(CatalogError::AlreadyExists {
                        identifier: role.to_string(),
                    });
                }
                state.roles.insert(role.to_string());
                Ok(())
            }
            MutationRequest::GrantPrivileges {
                privileges,
                category,
                database,
                schema,
                role,
                future,
            } => {
                require_schema(&state, database, schema)?;
                require_role(&state, role)?;
                let key = grant_key(privileges, *category, database, schema, role, *future);
                if !state.grants.insert(key) {
                    return Err(CatalogError::AlreadyGranted {
                        detail: request.describe(),
                    });
                }
                Ok(())
            }
            MutationRequest::TransferOwnership {
                category,
                database,
                schema,
                to,
            } => {
                require_schema(&state, database, schema)?;
                require_role(&state, to)?;
                state
                    .ownership
                    .insert(ownership_key(database, schema, *category), to.to_string());
                Ok(())
            }
            MutationRequest::ConfigureFutureOwnership {
                category,
                database,
                schema,
                to,
            } => {
                require_schema(&state, database, schema)?;
                require_role(&state, to)?;
                state
                    .future_ownership
                    .insert(ownership_key(database, schema, *category), to.to_string());
                Ok(())
            }
            MutationRequest::GrantCreate {
                categories,
                database,
                schema,
                role,
            } => {
                require_schema(&state, database, schema)?;
                require_role(&state, role)?;
                let categories = categories
                    .iter()
                    .map(ObjectCategory::token)
                    .collect::<Vec<_>>()
                    .join(",");
                let key = format!("CREATE:{categories}:{database}.{schema}:{role}");
                if !state.grants.insert(key) {
                    return Err(CatalogError::AlreadyGranted {
                        detail: request.describe(),
                    });
                }
                Ok(())
            }
            MutationRequest::GrantUsage {
                level,
                database,
                schema,
                role,
            } => {
                let key = match level {
                    ContainerLevel::Database => {
                        if !state.has_database(database) {
                            return Err(CatalogError::statement_failed(format!(
                                "database {database} does not exist"
                            )));
                        }
                        format!("USAGE:DATABASE:{database}:{role}")
                    }
                    ContainerLevel::Schema => {
                        let schema = schema.as_deref().unwrap_or_default();
                        require_schema(&state, database, schema)?;
                        format!("USAGE:SCHEMA:{database}.{schema}:{role}")
                    }
                };
                require_role(&state, role)?;
                if !state.grants.insert(key) {
                    return Err(CatalogError::AlreadyGranted {
                        detail: request.describe(),
                    });
                }
                Ok(())
            }
        }
    }
}

fn schema_key(database: &str, schema: &str) -> String {
    format!("{database}.{schema}")
}

fn ownership_key(database: &str, schema: &str, category: ObjectCategory) -> String {
    format!("{database}.{schema}.{}", category.token())
}

fn grant_key(
    privileges: &[Privilege],
    category: ObjectCategory,
    database: &str,
    schema: &str,
    role: &RoleName,
    future: bool,
) -> String {
    let privileges = privileges
        .iter()
        .map(Privilege::token)
        .collect::<Vec<_>>()
        .join(",");
    let tense = if future { "FUTURE" } else { "ALL" };
    format!(
        "GRANT:{privileges}:{tense}:{}:{database}.{schema}:{role}",
        category.token()
    )
}

fn require_schema(state: &SnapshotState, database: &str, schema: &str) -> CatalogResult<()> {
    if state.schemas.contains_key(&schema_key(database, schema)) {
        Ok(())
    } else {
        Err(CatalogError::SchemaNotFound {
            database: database.to_string(),
            schema: schema.to_string(),
        })
    }
}

fn require_role(state: &SnapshotState, role: &RoleName) -> CatalogResult<()> {
    if state.has_role(role.as_str()) {
        Ok(())
    } else {
        Err(CatalogError::RoleNotFound {
            role: role.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::Environment;

    fn admin() -> AuthorizationContext {
        AuthorizationContext::new(RoleName::new("SECURITY_ADMIN"))
    }

    fn catalog() -> SnapshotCatalog {
        SnapshotCatalog::new(
            SnapshotState::new()
                .with_schema("HR", "EMPLOYEES", false)
                .with_administrator("SECURITY_ADMIN"),
        )
    }

    fn grant_request(role: &str) -> MutationRequest {
        MutationRequest::GrantPrivileges {
            privileges: vec![Privilege::Select],
            category: ObjectCategory::Table,
            database: "HR".to_string(),
            schema: "EMPLOYEES".to_string(),
            role: RoleName::new(role),
            future: false,
        }
    }

    #[tokio::test]
    async fn test_schema_inspection() {
        let catalog = catalog();
        let present = Scope::new(Environment::Dev, "HR", "EMPLOYEES").unwrap();
        let absent = Scope::new(Environment::Uat, "FIN", "FINANCE").unwrap();

        assert!(catalog.schema_exists(&present).await.unwrap());
        assert!(!catalog.schema_exists(&absent).await.unwrap());
        // Missing schema is a normal false, not an error
        assert!(!catalog.is_managed_access(&absent).await.unwrap());
    }

    #[tokio::test]
    async fn test_unauthorized_role_cannot_mutate() {
        let catalog = catalog();
        let intruder = AuthorizationContext::new(RoleName::new("DEV_HR_EMPLOYEES_READ"));
        let err = catalog
            .execute(
                &intruder,
                &MutationRequest::CreateRole {
                    role: RoleName::new("X"),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "AUTHORIZATION_FAILED");
    }

    #[tokio::test]
    async fn test_duplicate_role_create_is_genuine_error() {
        let catalog = catalog();
        let request = MutationRequest::CreateRole {
            role: RoleName::new("DEV_HR_EMPLOYEES_READ"),
        };
        catalog.execute(&admin(), &request).await.unwrap();
        let err = catalog.execute(&admin(), &request).await.unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert!(!err.is_duplicate_grant());
    }

    #[tokio::test]
    async fn test_duplicate_grant_signals_already_granted() {
        let catalog = catalog();
        catalog
            .execute(
                &admin(),
                &MutationRequest::CreateRole {
                    role: RoleName::new("DEV_HR_EMPLOYEES_READ"),
                },
            )
            .await
            .unwrap();

        let request = grant_request("DEV_HR_EMPLOYEES_READ");
        catalog.execute(&admin(), &request).await.unwrap();
        let err = catalog.execute(&admin(), &request).await.unwrap_err();
        assert!(err.is_duplicate_grant());
    }

    #[tokio::test]
    async fn test_grant_to_missing_role_fails() {
        let catalog = catalog();
        let err = catalog
            .execute(&admin(), &grant_request("NO_SUCH_ROLE"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ROLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_managed_access_toggle_conflicts_on_rerun() {
        let catalog = catalog();
        let request = MutationRequest::EnableManagedAccess {
            database: "HR".to_string(),
            schema: "EMPLOYEES".to_string(),
        };
        catalog.execute(&admin(), &request).await.unwrap();
        let err = catalog.execute(&admin(), &request).await.unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let state = SnapshotState::new()
            .with_schema("HR", "EMPLOYEES", true)
            .with_role("PLATFORM_OPS")
            .with_administrator("SECURITY_ADMIN");
        let json = serde_json::to_string(&state).unwrap();
        let catalog = SnapshotCatalog::from_json(&json).unwrap();
        assert_eq!(catalog.state().unwrap(), state);
    }
}
