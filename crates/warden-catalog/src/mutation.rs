//! Typed Mutation Requests
//!
//! The engine never concatenates statement text. Every corrective action
//! carries one [`MutationRequest`] value; the catalog adapter turns it into
//! a parameterized statement on its side of the boundary. The executing
//! identity is an explicit [`AuthorizationContext`], not an ambient session
//! role.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use warden_core::RoleName;

/// Catalog object categories, in the platform's fixed, stable order.
///
/// The order is load-bearing: generation, grant emission, and the
/// per-category ownership steps all follow it, which keeps dry-run output
/// deterministic and diffable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Table,
    View,
    MaterializedView,
    DynamicTable,
    ExternalTable,
    Function,
    Procedure,
    Sequence,
    Stage,
    FileFormat,
    Stream,
    Task,
    Pipe,
}

impl ObjectCategory {
    /// Every category, in the fixed order.
    pub const ALL: [ObjectCategory; 13] = [
        ObjectCategory::Table,
        ObjectCategory::View,
        ObjectCategory::MaterializedView,
        ObjectCategory::DynamicTable,
        ObjectCategory::ExternalTable,
        ObjectCategory::Function,
        ObjectCategory::Procedure,
        ObjectCategory::Sequence,
        ObjectCategory::Stage,
        ObjectCategory::FileFormat,
        ObjectCategory::Stream,
        ObjectCategory::Task,
        ObjectCategory::Pipe,
    ];

    /// Upper-case token used in statements and grant keys.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            ObjectCategory::Table => "TABLE",
            ObjectCategory::View => "VIEW",
            ObjectCategory::MaterializedView => "MATERIALIZED_VIEW",
            ObjectCategory::DynamicTable => "DYNAMIC_TABLE",
            ObjectCategory::ExternalTable => "EXTERNAL_TABLE",
            ObjectCategory::Function => "FUNCTION",
            ObjectCategory::Procedure => "PROCEDURE",
            ObjectCategory::Sequence => "SEQUENCE",
            ObjectCategory::Stage => "STAGE",
            ObjectCategory::FileFormat => "FILE_FORMAT",
            ObjectCategory::Stream => "STREAM",
            ObjectCategory::Task => "TASK",
            ObjectCategory::Pipe => "PIPE",
        }
    }

    /// Read-level privileges for this category.
    #[must_use]
    pub fn read_privileges(&self) -> &'static [Privilege] {
        match self {
            ObjectCategory::Table
            | ObjectCategory::View
            | ObjectCategory::MaterializedView
            | ObjectCategory::DynamicTable
            | ObjectCategory::ExternalTable
            | ObjectCategory::Stream => &[Privilege::Select],
            ObjectCategory::Function
            | ObjectCategory::Procedure
            | ObjectCategory::Sequence
            | ObjectCategory::FileFormat => &[Privilege::Usage],
            ObjectCategory::Stage => &[Privilege::Read, Privilege::Usage],
            ObjectCategory::Task | ObjectCategory::Pipe => &[Privilege::Monitor],
        }
    }

    /// Additional write-level privileges; empty for categories with no
    /// write surface beyond their read privileges.
    #[must_use]
    pub fn write_privileges(&self) -> &'static [Privilege] {
        match self {
            ObjectCategory::Table => &[
                Privilege::Insert,
                Privilege::Update,
                Privilege::Delete,
                Privilege::Truncate,
            ],
            ObjectCategory::Stage => &[Privilege::Write],
            ObjectCategory::Task | ObjectCategory::Pipe => &[Privilege::Operate],
            _ => &[],
        }
    }
}

impl Display for ObjectCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A single grantable privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    Usage,
    Read,
    Write,
    Monitor,
    Operate,
}

impl Privilege {
    /// Upper-case token used in statements and grant keys.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Privilege::Select => "SELECT",
            Privilege::Insert => "INSERT",
            Privilege::Update => "UPDATE",
            Privilege::Delete => "DELETE",
            Privilege::Truncate => "TRUNCATE",
            Privilege::Usage => "USAGE",
            Privilege::Read => "READ",
            Privilege::Write => "WRITE",
            Privilege::Monitor => "MONITOR",
            Privilege::Operate => "OPERATE",
        }
    }
}

impl Display for Privilege {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Container level for a cross-cutting usage grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerLevel {
    Database,
    Schema,
}

/// The identity a mutation executes as.
///
/// Passing this explicitly makes the engine's required privilege level a
/// declared dependency instead of an ambient session assumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    role: RoleName,
}

impl AuthorizationContext {
    /// Execute as the given administrative role.
    #[must_use]
    pub fn new(role: RoleName) -> Self {
        Self { role }
    }

    /// The executing role.
    #[must_use]
    pub fn role(&self) -> &RoleName {
        &self.role
    }
}

/// One imperative catalog statement, as a typed value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum MutationRequest {
    /// Switch the schema to managed access, so grants flow through the
    /// schema owner.
    EnableManagedAccess { database: String, schema: String },

    /// Create a role node.
    CreateRole { role: RoleName },

    /// Grant a privilege set on one object category to a role, for existing
    /// objects or as an open-ended future grant.
    GrantPrivileges {
        privileges: Vec<Privilege>,
        category: ObjectCategory,
        database: String,
        schema: String,
        role: RoleName,
        future: bool,
    },

    /// Move ownership of all existing objects of one category to a role.
    TransferOwnership {
        category: ObjectCategory,
        database: String,
        schema: String,
        to: RoleName,
    },

    /// Route ownership of future objects of one category to a role.
    ConfigureFutureOwnership {
        category: ObjectCategory,
        database: String,
        schema: String,
        to: RoleName,
    },

    /// Grant create privileges on the schema for the listed categories.
    GrantCreate {
        categories: Vec<ObjectCategory>,
        database: String,
        schema: String,
        role: RoleName,
    },

    /// Cross-cutting usage grant at database or schema level.
    GrantUsage {
        level: ContainerLevel,
        database: String,
        schema: Option<String>,
        role: RoleName,
    },
}

impl MutationRequest {
    /// The role this request targets (grantee, created role, or new owner).
    /// `None` for managed-access toggles, which target the schema itself.
    #[must_use]
    pub fn target_role(&self) -> Option<&RoleName> {
        match self {
            MutationRequest::EnableManagedAccess { .. } => None,
            MutationRequest::CreateRole { role }
            | MutationRequest::GrantPrivileges { role, .. }
            | MutationRequest::GrantCreate { role, .. }
            | MutationRequest::GrantUsage { role, .. } => Some(role),
            MutationRequest::TransferOwnership { to, .. }
            | MutationRequest::ConfigureFutureOwnership { to, .. } => Some(to),
        }
    }

    /// Short human-readable summary for logs and reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            MutationRequest::EnableManagedAccess { database, schema } => {
                format!("enable managed access on {database}.{schema}")
            }
            MutationRequest::CreateRole { role } => format!("create role {role}"),
            MutationRequest::GrantPrivileges {
                privileges,
                category,
                database,
                schema,
                role,
                future,
            } => {
                let privileges = privileges
                    .iter()
                    .map(Privilege::token)
                    .collect::<Vec<_>>()
                    .join(",");
                let tense = if *future { "future" } else { "all" };
                format!("grant {privileges} on {tense} {category}s in {database}.{schema} to {role}")
            }
            MutationRequest::TransferOwnership {
                category,
                database,
                schema,
                to,
            } => format!("transfer ownership of all {category}s in {database}.{schema} to {to}"),
            MutationRequest::ConfigureFutureOwnership {
                category,
                database,
                schema,
                to,
            } => format!("route ownership of future {category}s in {database}.{schema} to {to}"),
            MutationRequest::GrantCreate {
                categories,
                database,
                schema,
                role,
            } => {
                let categories = categories
                    .iter()
                    .map(ObjectCategory::token)
                    .collect::<Vec<_>>()
                    .join(",");
                format!("grant create {categories} on {database}.{schema} to {role}")
            }
            MutationRequest::GrantUsage {
                level,
                database,
                schema,
                role,
            } => match level {
                ContainerLevel::Database => format!("grant usage on database {database} to {role}"),
                ContainerLevel::Schema => format!(
                    "grant usage on schema {database}.{} to {role}",
                    schema.as_deref().unwrap_or_default()
                ),
            },
        }
    }
}
