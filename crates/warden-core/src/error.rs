//! Error Types
//!
//! Standardized error types for warden. Validation failures are detected
//! before any catalog access and map to a terminal `Error` outcome in the
//! reconciliation report.

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for warden.
///
/// # Example
///
/// ```
/// use warden_core::{WardenError, Result};
///
/// fn check_name(name: &str) -> Result<()> {
///     if name.is_empty() {
///         return Err(WardenError::Validation {
///             field: "database".to_string(),
///             message: "identifier must not be empty".to_string(),
///         });
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WardenError {
    /// Input validation failure on a scope field.
    #[error("validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// The environment code is not one of DEV, TST, UAT, PPE, PRD.
    #[error("unknown environment code: '{value}'")]
    UnknownEnvironment {
        /// The rejected environment code
        value: String,
    },

    /// The capability level name is not recognised.
    #[error("unknown capability level: '{value}'")]
    UnknownCapability {
        /// The rejected capability name
        value: String,
    },
}

/// Type alias for Results using [`WardenError`].
pub type Result<T> = std::result::Result<T, WardenError>;
