//! Canonical Role Naming
//!
//! Pure derivation of role and permission-group names from a scope. The
//! convention is deterministic concatenation of scope fields joined with
//! `_`. Identifiers may themselves contain `_` and `$`, so segments are
//! escaped (`$` -> `$$`, `_` -> `$_`) before joining; every `$` in a
//! derived name starts an escape pair, which makes the segmentation
//! unambiguous and the derivation injective over distinct scopes.
//! Identifiers without `_` or `$` derive the plain concatenated form.
//! Nothing in this module performs I/O.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::capability::CapabilityLevel;
use crate::scope::Scope;

/// The centralized operations role that owns objects and runs pipelines in
/// every non-DEV environment.
pub const OPERATIONS_ROLE: &str = "PLATFORM_OPS";

/// A canonical role or permission-group name.
///
/// Derived deterministically and never mutated; equality is by string
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Wrap an already-canonical name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RoleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Roles resolved for one (scope, capability) pair.
///
/// `write` and `creator` are `None` outside DEV: every other environment is
/// read-oriented and object creation is reserved to the operations owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityRoles {
    /// Read-access role for this capability tier.
    pub read: RoleName,
    /// Write-access role; DEV only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<RoleName>,
    /// Role that owns objects in this scope.
    pub owner: RoleName,
    /// Role allowed to create objects; DEV only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<RoleName>,
}

/// The capability-independent permission groups for a schema.
///
/// These are the nodes the desired-state generator materialises; capability
/// tiers are granted membership of them by the identity provider, outside
/// this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaGroups {
    /// Read permission group covering every object category.
    pub read: RoleName,
    /// Write permission group; DEV only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<RoleName>,
    /// Ownership owner: the DEV developer role, or the operations role.
    pub owner: RoleName,
    /// The centralized operations role.
    pub operations: RoleName,
}

/// Resolve the canonical roles for one (scope, capability) pair.
///
/// Pure and total: never fails for a validated scope, and injective over
/// distinct (scope, capability) inputs.
#[must_use]
pub fn resolve(scope: &Scope, capability: CapabilityLevel) -> CapabilityRoles {
    let prefix = scope_prefix(scope);
    let read = RoleName::new(format!("{prefix}_{}_R", capability.token()));
    let (write, creator) = if scope.environment().is_write_eligible() {
        (
            Some(RoleName::new(format!("{prefix}_{}_W", capability.token()))),
            Some(developer_role(scope)),
        )
    } else {
        (None, None)
    };
    CapabilityRoles {
        read,
        write,
        owner: owner_role(scope),
        creator,
    }
}

/// Resolve the capability-independent permission groups for a scope.
#[must_use]
pub fn schema_groups(scope: &Scope) -> SchemaGroups {
    let prefix = scope_prefix(scope);
    let write = scope
        .environment()
        .is_write_eligible()
        .then(|| RoleName::new(format!("{prefix}_WRITE")));
    SchemaGroups {
        read: RoleName::new(format!("{prefix}_READ")),
        write,
        owner: owner_role(scope),
        operations: RoleName::new(OPERATIONS_ROLE),
    }
}

/// The role that owns objects in this scope.
#[must_use]
pub fn owner_role(scope: &Scope) -> RoleName {
    if scope.environment().is_write_eligible() {
        developer_role(scope)
    } else {
        RoleName::new(OPERATIONS_ROLE)
    }
}

fn developer_role(scope: &Scope) -> RoleName {
    RoleName::new(format!(
        "{}_{}_{}",
        scope.environment(),
        encode_segment(scope.database()),
        CapabilityLevel::Developer.token()
    ))
}

fn scope_prefix(scope: &Scope) -> String {
    format!(
        "{}_{}_{}",
        scope.environment(),
        encode_segment(scope.database()),
        encode_segment(scope.schema())
    )
}

/// Escape an identifier segment so the `_` joiner cannot be forged by the
/// segment's own characters: `$` -> `$$`, `_` -> `$_`.
fn encode_segment(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '$' => encoded.push_str("$$"),
            '_' => encoded.push_str("$_"),
            _ => encoded.push(c),
        }
    }
    encoded
}
