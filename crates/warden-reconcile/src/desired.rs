//! Desired-state generation.
//!
//! The desired topology for a scope is a pure function of the scope and
//! the fixed policy rules. No hidden state influences it, and identical
//! inputs yield byte-identical ordered output.

use serde::Serialize;

use warden_catalog::{ObjectCategory, Privilege};
use warden_core::{naming, RoleName, SchemaGroups, Scope};

/// One privilege grant a topology node should hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivilegeGrant {
    /// Object category the grant covers.
    pub category: ObjectCategory,
    /// Privileges granted on that category.
    pub privileges: Vec<Privilege>,
    /// Whether this is an open-ended future grant.
    pub future: bool,
}

/// A role or permission-group node with the state it should hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyNode {
    /// Canonical role name.
    pub role: RoleName,
    /// Whether this node owns the schema's objects.
    pub owns_objects: bool,
    /// Privilege statements this node should hold, in emission order.
    pub grants: Vec<PrivilegeGrant>,
    /// Categories this node may create on the schema.
    pub create_categories: Vec<ObjectCategory>,
}

/// The expected topology for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredTopology {
    /// The scope this topology was computed for.
    pub scope: Scope,
    /// The derived permission groups.
    pub groups: SchemaGroups,
    /// Managed access is mandated for every reconciled schema.
    pub managed_access: bool,
    /// Access nodes: read group first, then the write group where one
    /// applies.
    pub nodes: Vec<TopologyNode>,
    /// The ownership owner node.
    pub owner: TopologyNode,
    /// Operations role needing cross-cutting usage; non-DEV only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_usage: Option<RoleName>,
}

/// Build the expected topology for a scope.
#[must_use]
pub fn desired_topology(scope: &Scope) -> DesiredTopology {
    let groups = naming::schema_groups(scope);

    let mut nodes = vec![TopologyNode {
        role: groups.read.clone(),
        owns_objects: false,
        grants: read_grants(),
        create_categories: Vec::new(),
    }];

    if let Some(write) = &groups.write {
        nodes.push(TopologyNode {
            role: write.clone(),
            owns_objects: false,
            grants: write_grants(),
            create_categories: Vec::new(),
        });
    }

    let owner = TopologyNode {
        role: groups.owner.clone(),
        owns_objects: true,
        grants: Vec::new(),
        create_categories: ObjectCategory::ALL.to_vec(),
    };

    let cross_usage = (!scope.environment().is_write_eligible())
        .then(|| groups.operations.clone());

    DesiredTopology {
        scope: scope.clone(),
        groups,
        managed_access: true,
        nodes,
        owner,
        cross_usage,
    }
}

/// Read grants: every category, existing objects then future objects, in
/// the fixed category order.
fn read_grants() -> Vec<PrivilegeGrant> {
    let mut grants = Vec::with_capacity(ObjectCategory::ALL.len() * 2);
    for category in ObjectCategory::ALL {
        for future in [false, true] {
            grants.push(PrivilegeGrant {
                category,
                privileges: category.read_privileges().to_vec(),
                future,
            });
        }
    }
    grants
}

/// Write grants: only categories with a write surface.
fn write_grants() -> Vec<PrivilegeGrant> {
    let mut grants = Vec::new();
    for category in ObjectCategory::ALL {
        let privileges = category.write_privileges();
        if privileges.is_empty() {
            continue;
        }
        for future in [false, true] {
            grants.push(PrivilegeGrant {
                category,
                privileges: privileges.to_vec(),
                future,
            });
        }
    }
    grants
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::Environment;

    fn scope(env: Environment) -> Scope {
        Scope::new(env, "HR", "EMPLOYEES").unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = desired_topology(&scope(Environment::Dev));
        let b = desired_topology(&scope(Environment::Dev));
        assert_eq!(a, b);
        // Byte-identical serialized output
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_dev_topology_has_write_node() {
        let topology = desired_topology(&scope(Environment::Dev));
        assert_eq!(topology.nodes.len(), 2);
        assert_eq!(topology.nodes[1].role.as_str(), "DEV_HR_EMPLOYEES_WRITE");
        assert!(topology.cross_usage.is_none());
        assert_eq!(topology.owner.role.as_str(), "DEV_HR_DEVELOPER");
    }

    #[test]
    fn test_non_dev_topology_is_read_only_with_cross_usage() {
        let topology = desired_topology(&scope(Environment::Prd));
        assert_eq!(topology.nodes.len(), 1);
        assert_eq!(
            topology.cross_usage.as_ref().unwrap().as_str(),
            naming::OPERATIONS_ROLE
        );
        assert_eq!(topology.owner.role.as_str(), naming::OPERATIONS_ROLE);
    }

    #[test]
    fn test_read_grants_cover_every_category_existing_and_future() {
        let topology = desired_topology(&scope(Environment::Uat));
        let grants = &topology.nodes[0].grants;
        assert_eq!(grants.len(), ObjectCategory::ALL.len() * 2);
        // Category-major, existing before future
        assert_eq!(grants[0].category, ObjectCategory::Table);
        assert!(!grants[0].future);
        assert!(grants[1].future);
    }

    #[test]
    fn test_grant_order_follows_fixed_category_order() {
        let topology = desired_topology(&scope(Environment::Uat));
        let categories: Vec<_> = topology.nodes[0]
            .grants
            .iter()
            .step_by(2)
            .map(|g| g.category)
            .collect();
        assert_eq!(categories, ObjectCategory::ALL.to_vec());
    }

    #[test]
    fn test_write_grants_skip_read_only_categories() {
        let topology = desired_topology(&scope(Environment::Dev));
        let write_grants = &topology.nodes[1].grants;
        assert!(write_grants
            .iter()
            .all(|g| !g.category.write_privileges().is_empty()));
        assert!(write_grants
            .iter()
            .any(|g| g.category == ObjectCategory::Table));
        assert!(!write_grants
            .iter()
            .any(|g| g.category == ObjectCategory::View));
    }

    #[test]
    fn test_owner_creates_every_category() {
        let topology = desired_topology(&scope(Environment::Tst));
        assert!(topology.owner.owns_objects);
        assert_eq!(topology.owner.create_categories, ObjectCategory::ALL.to_vec());
    }

    #[test]
    fn test_managed_access_is_always_mandated() {
        for env in Environment::ALL {
            assert!(desired_topology(&scope(env)).managed_access);
        }
    }
}
