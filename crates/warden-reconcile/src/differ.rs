//! Desired-vs-actual diffing.
//!
//! Emits one corrective action per independently-failable unit of work, in
//! dependency order: managed-access toggle, role creation, privilege
//! grants, ownership transfer, future-ownership routing, create grants,
//! cross-role usage. Within the ownership tiers the fixed object-category
//! order applies, so dry-run output is deterministic and diffable.
//!
//! The inspector can observe role existence and the managed-access flag,
//! nothing finer. Grants for a group are therefore keyed on that group
//! being absent, and the ownership tiers on the read group being absent
//! (schema not yet onboarded). A clean re-run after a successful apply
//! produces an empty list.

use std::collections::BTreeSet;

use warden_catalog::{ContainerLevel, MutationRequest};
use warden_core::RoleName;

use crate::action::CorrectiveAction;
use crate::desired::{DesiredTopology, TopologyNode};
use crate::types::ActionKind;

/// Observed topology for a scope, as far as the catalog inspector can see.
#[derive(Debug, Clone, Default)]
pub struct ActualTopology {
    /// Whether the schema already has managed access enabled.
    pub managed_access: bool,
    present_roles: BTreeSet<String>,
}

impl ActualTopology {
    /// Observed state with no roles present.
    #[must_use]
    pub fn new(managed_access: bool) -> Self {
        Self {
            managed_access,
            present_roles: BTreeSet::new(),
        }
    }

    /// Record a role observed in the catalog.
    #[must_use]
    pub fn with_role(mut self, role: &RoleName) -> Self {
        self.present_roles.insert(role.to_string());
        self
    }

    /// Whether a role was observed.
    #[must_use]
    pub fn role_present(&self, role: &RoleName) -> bool {
        self.present_roles.contains(role.as_str())
    }
}

/// Compare desired and actual topology, emitting ordered corrective
/// actions. Pure; nodes already matching actual state produce nothing.
#[must_use]
pub fn diff(desired: &DesiredTopology, actual: &ActualTopology) -> Vec<CorrectiveAction> {
    let database = desired.scope.database();
    let schema = desired.scope.schema();
    let mut actions = Vec::new();

    // Tier 1: managed access precedes everything else.
    if desired.managed_access && !actual.managed_access {
        actions.push(CorrectiveAction::new(
            ActionKind::EnableManagedAccess,
            format!("{database}.{schema}"),
            MutationRequest::EnableManagedAccess {
                database: database.to_string(),
                schema: schema.to_string(),
            },
        ));
    }

    let missing: Vec<&TopologyNode> = desired
        .nodes
        .iter()
        .filter(|node| !actual.role_present(&node.role))
        .collect();

    // Tier 2: role creation before any grant references the role.
    for node in &missing {
        actions.push(CorrectiveAction::new(
            ActionKind::CreateRole,
            node.role.as_str(),
            MutationRequest::CreateRole {
                role: node.role.clone(),
            },
        ));
    }

    // Tier 3: privilege grants for freshly created groups.
    for node in &missing {
        for grant in &node.grants {
            actions.push(CorrectiveAction::new(
                ActionKind::GrantPrivilegeSet,
                node.role.as_str(),
                MutationRequest::GrantPrivileges {
                    privileges: grant.privileges.clone(),
                    category: grant.category,
                    database: database.to_string(),
                    schema: schema.to_string(),
                    role: node.role.clone(),
                    future: grant.future,
                },
            ));
        }
    }

    // Tiers 4-8 run once, when the schema is first onboarded.
    let onboarding = missing.iter().any(|node| node.role == desired.groups.read);
    if !onboarding {
        return actions;
    }

    // Tier 4: existing-object ownership, per category in fixed order.
    for category in desired.owner.create_categories.iter().copied() {
        actions.push(CorrectiveAction::new(
            ActionKind::TransferOwnership,
            desired.owner.role.as_str(),
            MutationRequest::TransferOwnership {
                category,
                database: database.to_string(),
                schema: schema.to_string(),
                to: desired.owner.role.clone(),
            },
        ));
    }

    // Tier 5: future-object ownership routing, same order.
    for category in desired.owner.create_categories.iter().copied() {
        actions.push(CorrectiveAction::new(
            ActionKind::ConfigureFutureOwnership,
            desired.owner.role.as_str(),
            MutationRequest::ConfigureFutureOwnership {
                category,
                database: database.to_string(),
                schema: schema.to_string(),
                to: desired.owner.role.clone(),
            },
        ));
    }

    // Tier 6: create privileges for the owner.
    actions.push(CorrectiveAction::new(
        ActionKind::GrantCreatePrivileges,
        desired.owner.role.as_str(),
        MutationRequest::GrantCreate {
            categories: desired.owner.create_categories.clone(),
            database: database.to_string(),
            schema: schema.to_string(),
            role: desired.owner.role.clone(),
        },
    ));

    // Tier 7: cross-cutting usage for the operations pipeline role.
    if let Some(operations) = &desired.cross_usage {
        actions.push(CorrectiveAction::new(
            ActionKind::GrantCrossRoleUsage,
            operations.as_str(),
            MutationRequest::GrantUsage {
                level: ContainerLevel::Database,
                database: database.to_string(),
                schema: None,
                role: operations.clone(),
            },
        ));
        actions.push(CorrectiveAction::new(
            ActionKind::GrantCrossRoleUsage,
            operations.as_str(),
            MutationRequest::GrantUsage {
                level: ContainerLevel::Schema,
                database: database.to_string(),
                schema: Some(schema.to_string()),
                role: operations.clone(),
            },
        ));
    }

    // Operator reminder: group membership is linked in the identity
    // provider, outside this engine.
    actions.push(CorrectiveAction::notice(
        desired.groups.read.as_str(),
        "link the schema's data-access groups to their identity-provider groups",
    ));

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desired::desired_topology;
    use warden_core::{Environment, Scope};

    fn desired(env: Environment) -> DesiredTopology {
        desired_topology(&Scope::new(env, "HR", "EMPLOYEES").unwrap())
    }

    fn fully_converged(desired: &DesiredTopology) -> ActualTopology {
        let mut actual = ActualTopology::new(true);
        for node in &desired.nodes {
            actual = actual.with_role(&node.role);
        }
        actual
    }

    #[test]
    fn test_clean_state_produces_empty_diff() {
        let desired = desired(Environment::Dev);
        let actions = diff(&desired, &fully_converged(&desired));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_cold_start_emits_every_tier_in_order() {
        let desired = desired(Environment::Dev);
        let actions = diff(&desired, &ActualTopology::new(false));

        let kinds: Vec<_> = actions.iter().map(|a| a.kind).collect();
        let first = |kind| kinds.iter().position(|k| *k == kind).unwrap();
        let last = |kind| kinds.iter().rposition(|k| *k == kind).unwrap();

        assert!(last(ActionKind::EnableManagedAccess) < first(ActionKind::CreateRole));
        assert!(last(ActionKind::CreateRole) < first(ActionKind::GrantPrivilegeSet));
        assert!(last(ActionKind::GrantPrivilegeSet) < first(ActionKind::TransferOwnership));
        assert!(last(ActionKind::TransferOwnership) < first(ActionKind::ConfigureFutureOwnership));
        assert!(
            last(ActionKind::ConfigureFutureOwnership) < first(ActionKind::GrantCreatePrivileges)
        );
        assert_eq!(kinds.last(), Some(&ActionKind::Notice));
    }

    #[test]
    fn test_ownership_tiers_follow_category_order() {
        let desired = desired(Environment::Dev);
        let actions = diff(&desired, &ActualTopology::new(false));
        let transfer_categories: Vec<_> = actions
            .iter()
            .filter_map(|a| match &a.request {
                Some(MutationRequest::TransferOwnership { category, .. }) => Some(*category),
                _ => None,
            })
            .collect();
        let mut sorted = transfer_categories.clone();
        sorted.sort();
        assert_eq!(transfer_categories, sorted);
        assert!(!transfer_categories.is_empty());
    }

    #[test]
    fn test_non_dev_emits_no_write_or_developer_actions() {
        for env in [
            Environment::Tst,
            Environment::Uat,
            Environment::Ppe,
            Environment::Prd,
        ] {
            let desired = desired(env);
            let actions = diff(&desired, &ActualTopology::new(false));
            assert!(actions
                .iter()
                .all(|a| !a.target.contains("WRITE") && !a.target.contains("DEVELOPER")));
            assert!(actions
                .iter()
                .any(|a| a.kind == ActionKind::GrantCrossRoleUsage));
        }
    }

    #[test]
    fn test_dev_emits_no_cross_role_usage() {
        let desired = desired(Environment::Dev);
        let actions = diff(&desired, &ActualTopology::new(false));
        assert!(actions
            .iter()
            .all(|a| a.kind != ActionKind::GrantCrossRoleUsage));
    }

    #[test]
    fn test_managed_schema_skips_toggle() {
        let desired = desired(Environment::Dev);
        let actions = diff(&desired, &ActualTopology::new(true));
        assert!(actions
            .iter()
            .all(|a| a.kind != ActionKind::EnableManagedAccess));
        assert!(actions.iter().any(|a| a.kind == ActionKind::CreateRole));
    }

    #[test]
    fn test_missing_write_group_alone_repairs_only_write_group() {
        let desired = desired(Environment::Dev);
        let actual = ActualTopology::new(true).with_role(&desired.groups.read);
        let actions = diff(&desired, &actual);

        // Read group converged, so no onboarding tiers re-run.
        assert!(actions
            .iter()
            .all(|a| a.kind != ActionKind::TransferOwnership && a.kind != ActionKind::Notice));
        let write = desired.groups.write.as_ref().unwrap();
        assert!(actions
            .iter()
            .all(|a| a.target == write.as_str()));
        assert!(actions.iter().any(|a| a.kind == ActionKind::CreateRole));
        assert!(actions
            .iter()
            .any(|a| a.kind == ActionKind::GrantPrivilegeSet));
    }

    #[test]
    fn test_grant_actions_precede_same_category_ownership_transfer() {
        // Ordering invariant: no TRANSFER_OWNERSHIP for a category before
        // the grant tier for the scope.
        let desired = desired(Environment::Prd);
        let actions = diff(&desired, &ActualTopology::new(false));
        let last_grant = actions
            .iter()
            .rposition(|a| a.kind == ActionKind::GrantPrivilegeSet)
            .unwrap();
        let first_transfer = actions
            .iter()
            .position(|a| a.kind == ActionKind::TransferOwnership)
            .unwrap();
        assert!(last_grant < first_transfer);
    }
}
