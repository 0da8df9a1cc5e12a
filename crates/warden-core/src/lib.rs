//! warden Core Library
//!
//! Shared types for the warden access-control platform.
//!
//! # Modules
//!
//! - [`environment`] - Platform environments (DEV..PRD) and write eligibility
//! - [`capability`] - Ordered capability levels (END_USER..DBADMIN)
//! - [`scope`] - The (environment, database, schema) reconciliation unit
//! - [`naming`] - Canonical role-name derivation from a scope
//! - [`error`] - Standardized error types (WardenError)
//!
//! # Example
//!
//! ```
//! use warden_core::{Environment, Scope, naming};
//!
//! let scope = Scope::new(Environment::Dev, "hr", "employees").unwrap();
//! let groups = naming::schema_groups(&scope);
//!
//! assert_eq!(groups.read.as_str(), "DEV_HR_EMPLOYEES_READ");
//! assert!(groups.write.is_some());
//! ```

pub mod capability;
pub mod environment;
pub mod error;
pub mod naming;
pub mod scope;

// Re-export main types for convenient access
pub use capability::CapabilityLevel;
pub use environment::Environment;
pub use error::{Result, WardenError};
pub use naming::{CapabilityRoles, RoleName, SchemaGroups};
pub use scope::Scope;
