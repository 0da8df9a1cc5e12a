//! # Access-Control Reconciliation Engine
//!
//! Computes the policy-mandated permission topology for a scope, diffs it
//! against the live catalog, and applies a minimal, ordered,
//! partial-failure-tolerant sequence of corrective actions.
//!
//! ## Overview
//!
//! - Desired state is a pure function of the scope and fixed policy rules
//! - One corrective action per independently-failable unit of work
//! - Dependency-ordered action lists: managed access before role creation,
//!   role creation before grants, grants before ownership transfer
//! - Dry-run mode previews the full plan without touching the catalog
//! - Per-action failure isolation with benign duplicate-grant swallowing
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     ReconciliationEngine                       │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  ┌────────────┐   ┌──────────┐   ┌────────────┐   ┌─────────┐ │
//! │  │  Desired   │──►│  Differ  │──►│  Executor  │──►│ Report  │ │
//! │  │  Topology  │   │          │   │            │   │         │ │
//! │  └────────────┘   └──────────┘   └────────────┘   └─────────┘ │
//! │        │                │               │                     │
//! │        ▼                ▼               ▼                     │
//! │  naming resolver   CatalogRead     CatalogMutate              │
//! │  (warden-core)    (inspection)    (typed mutations)           │
//! │                                                                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use warden_reconcile::{ReconcileRequest, ReconciliationEngine, RunMode};
//!
//! let engine = ReconciliationEngine::new(catalog, authorization);
//! let report = engine
//!     .reconcile(ReconcileRequest::new("DEV", "HR", "EMPLOYEES", RunMode::DryRun))
//!     .await;
//!
//! for action in &report.actions {
//!     println!("{:?} {}", action.kind, action.target);
//! }
//! ```

pub mod action;
pub mod desired;
pub mod differ;
pub mod engine;
pub mod executor;
pub mod report;
pub mod types;

// Re-export main types
pub use action::{ActionError, CorrectiveAction};
pub use desired::{desired_topology, DesiredTopology, PrivilegeGrant, TopologyNode};
pub use differ::{diff, ActualTopology};
pub use engine::{ReconcileRequest, ReconciliationEngine};
pub use executor::ActionExecutor;
pub use report::ReconciliationReport;
pub use types::{ActionKind, ActionStatus, RunMode, RunStatus};
