//! warden Catalog Boundary
//!
//! Everything the reconciliation engine knows about the access-control
//! catalog lives behind this crate: read-only inspection, a typed mutation
//! request vocabulary, and structured error classification that separates
//! benign duplicate-state failures from genuine ones.
//!
//! The catalog itself is an opaque collaborator. [`snapshot::SnapshotCatalog`]
//! is the bundled implementation over an exported catalog snapshot, used by
//! the CLI's offline planning workflow and by tests.

pub mod error;
pub mod mutation;
pub mod snapshot;
pub mod traits;

pub use error::{CatalogError, CatalogResult};
pub use mutation::{
    AuthorizationContext, ContainerLevel, MutationRequest, ObjectCategory, Privilege,
};
pub use snapshot::{SnapshotCatalog, SnapshotState};
pub use traits::{Catalog, CatalogMutate, CatalogRead};
