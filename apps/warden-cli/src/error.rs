//! CLI error types and exit codes

use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success (including a plan with corrective actions)
/// - 1: Partial success, or a local error (snapshot I/O, serialization)
/// - 2: Reconciliation error (validation, precondition, or every action failed)
///
/// Invalid scope input surfaces in the report envelope and exits 2;
/// malformed command lines are rejected by the argument parser.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Reconciliation applied with failures. See the report above.")]
    PartialApply,

    #[error("Reconciliation failed. See the report above.")]
    ReconciliationFailed,

    #[error("JSON error: {0}")]
    Json(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Snapshot(_) | CliError::Json(_) => 1,
            CliError::PartialApply => 1,
            CliError::ReconciliationFailed => 2,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Snapshot(_) => {
                Some("Check the --snapshot path and that the file is valid snapshot JSON.")
            }
            CliError::ReconciliationFailed => {
                Some("Run 'warden plan' against the same scope to see what the engine expects.")
            }
            _ => None,
        }
    }
}

impl From<warden_catalog::CatalogError> for CliError {
    fn from(e: warden_catalog::CatalogError) -> Self {
        CliError::Snapshot(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_snapshot() {
        assert_eq!(CliError::Snapshot("missing".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_exit_code_partial_apply() {
        assert_eq!(CliError::PartialApply.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_reconciliation_failed() {
        assert_eq!(CliError::ReconciliationFailed.exit_code(), 2);
    }
}
