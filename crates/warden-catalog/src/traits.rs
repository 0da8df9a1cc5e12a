//! Catalog capability traits
//!
//! Read inspection and mutation are separate capabilities so the dry-run
//! path can be typed against [`CatalogRead`] alone. A schema that does not
//! exist is a normal `Ok(false)` from the inspector, never an error; the
//! engine decides what non-existence means for the run.

use async_trait::async_trait;

use warden_core::{RoleName, Scope};

use crate::error::CatalogResult;
use crate::mutation::{AuthorizationContext, MutationRequest};

/// Read-only inspection of the access-control catalog.
#[async_trait]
pub trait CatalogRead: Send + Sync {
    /// Whether the scope's schema exists.
    async fn schema_exists(&self, scope: &Scope) -> CatalogResult<bool>;

    /// Whether the scope's schema has managed access enabled.
    ///
    /// Returns `Ok(false)` when the schema does not exist.
    async fn is_managed_access(&self, scope: &Scope) -> CatalogResult<bool>;

    /// Whether a role node exists.
    async fn role_exists(&self, role: &RoleName) -> CatalogResult<bool>;
}

/// Mutation of the access-control catalog, one imperative statement per
/// call, executed as an explicit identity.
#[async_trait]
pub trait CatalogMutate: Send + Sync {
    /// Execute one mutation request.
    async fn execute(
        &self,
        authorization: &AuthorizationContext,
        request: &MutationRequest,
    ) -> CatalogResult<()>;
}

/// A catalog that supports both inspection and mutation.
pub trait Catalog: CatalogRead + CatalogMutate {}

impl<T: CatalogRead + CatalogMutate> Catalog for T {}
