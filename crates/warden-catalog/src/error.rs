//! Catalog error types
//!
//! Error definitions with duplicate-state and transient classification.
//! The executor leans on [`CatalogError::is_duplicate_grant`] to decide
//! whether a failed privilege grant is a benign re-run artefact or a
//! genuine failure; it never swallows errors it cannot classify.

use thiserror::Error;

/// Error that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the catalog.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The catalog did not answer within the connection's timeout.
    #[error("catalog timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    // Precondition errors (permanent)
    /// The target schema does not exist.
    #[error("schema {database}.{schema} does not exist")]
    SchemaNotFound { database: String, schema: String },

    /// A role referenced by the statement does not exist.
    #[error("role not found: {role}")]
    RoleNotFound { role: String },

    // Duplicate-state errors
    /// The entity being created already exists (create-role or
    /// managed-access conflict). Not benign: the differ should not have
    /// emitted the action.
    #[error("entity already exists: {identifier}")]
    AlreadyExists { identifier: String },

    /// The privilege being granted is already held by the grantee.
    /// Benign on re-runs of grant statements.
    #[error("privilege already granted: {detail}")]
    AlreadyGranted { detail: String },

    // Authorization errors (permanent)
    /// The executing identity lacks the privilege for this statement.
    #[error("authorization failed for role '{role}': {message}")]
    Authorization { role: String, message: String },

    // Statement errors
    /// The catalog rejected or failed the statement.
    #[error("statement failed: {message}")]
    StatementFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Snapshot backend errors
    /// Loading, parsing, or persisting a catalog snapshot failed.
    #[error("snapshot error: {message}")]
    Snapshot { message: String },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CatalogError {
    /// Whether this failure is a benign duplicate-grant signal.
    ///
    /// Only privilege-grant statements may treat this as a no-op success;
    /// duplicate creates remain genuine errors.
    #[must_use]
    pub fn is_duplicate_grant(&self) -> bool {
        matches!(self, CatalogError::AlreadyGranted { .. })
    }

    /// Whether this error is transient and a later run may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionFailed { .. } | CatalogError::Timeout { .. }
        )
    }

    /// Stable code for classification in reports and logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            CatalogError::Timeout { .. } => "TIMEOUT",
            CatalogError::SchemaNotFound { .. } => "SCHEMA_NOT_FOUND",
            CatalogError::RoleNotFound { .. } => "ROLE_NOT_FOUND",
            CatalogError::AlreadyExists { .. } => "ALREADY_EXISTS",
            CatalogError::AlreadyGranted { .. } => "ALREADY_GRANTED",
            CatalogError::Authorization { .. } => "AUTHORIZATION_FAILED",
            CatalogError::StatementFailed { .. } => "STATEMENT_FAILED",
            CatalogError::Snapshot { .. } => "SNAPSHOT_ERROR",
            CatalogError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        CatalogError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a statement failed error.
    pub fn statement_failed(message: impl Into<String>) -> Self {
        CatalogError::StatementFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a statement failed error with source.
    pub fn statement_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CatalogError::StatementFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CatalogError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
