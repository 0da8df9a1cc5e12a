//! Reconciliation Scope
//!
//! A scope identifies one reconciliation unit: a schema within a data
//! domain's database in one environment. Scopes are validated on
//! construction and immutable afterwards, so any `Scope` value held by the
//! engine is known to be well-formed.

use serde::Serialize;
use std::fmt::{Display, Formatter};

use crate::environment::Environment;
use crate::error::{Result, WardenError};

/// Longest identifier accepted for database and schema names.
const MAX_IDENTIFIER_LEN: usize = 128;

/// The (environment, database, schema) triple a reconciliation run targets.
///
/// Identifiers are normalized to upper case, matching the catalog's
/// case-insensitive identifier resolution.
///
/// # Example
///
/// ```
/// use warden_core::{Environment, Scope};
///
/// let scope = Scope::new(Environment::Prd, "sales", "orders").unwrap();
/// assert_eq!(scope.database(), "SALES");
/// assert_eq!(scope.schema(), "ORDERS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Scope {
    environment: Environment,
    database: String,
    schema: String,
}

impl Scope {
    /// Create a validated scope.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Validation`] when the database or schema name
    /// is empty, too long, digit-leading, or contains characters outside
    /// `[A-Za-z0-9_$]`.
    pub fn new(
        environment: Environment,
        database: impl AsRef<str>,
        schema: impl AsRef<str>,
    ) -> Result<Self> {
        let database = validate_identifier("database", database.as_ref())?;
        let schema = validate_identifier("schema", schema.as_ref())?;
        Ok(Self {
            environment,
            database,
            schema,
        })
    }

    /// The environment this scope targets.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The upper-cased database (data domain) name.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The upper-cased schema name.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.environment, self.database, self.schema)
    }
}

/// Validate and normalize a catalog identifier.
fn validate_identifier(field: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(WardenError::Validation {
            field: field.to_string(),
            message: "identifier must not be empty".to_string(),
        });
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(WardenError::Validation {
            field: field.to_string(),
            message: format!("identifier exceeds {MAX_IDENTIFIER_LEN} characters"),
        });
    }
    if value.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(WardenError::Validation {
            field: field.to_string(),
            message: "identifier must not start with a digit".to_string(),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$'))
    {
        return Err(WardenError::Validation {
            field: field.to_string(),
            message: format!("identifier contains invalid character '{bad}'"),
        });
    }
    Ok(value.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_to_upper_case() {
        let scope = Scope::new(Environment::Dev, "hr", "employees").unwrap();
        assert_eq!(scope.database(), "HR");
        assert_eq!(scope.schema(), "EMPLOYEES");
    }

    #[test]
    fn test_rejects_empty_identifier() {
        let err = Scope::new(Environment::Dev, "", "employees").unwrap_err();
        assert!(matches!(err, WardenError::Validation { ref field, .. } if field == "database"));
    }

    #[test]
    fn test_rejects_digit_leading_identifier() {
        let err = Scope::new(Environment::Dev, "hr", "1employees").unwrap_err();
        assert!(matches!(err, WardenError::Validation { ref field, .. } if field == "schema"));
    }

    #[test]
    fn test_rejects_invalid_character() {
        let err = Scope::new(Environment::Dev, "hr", "emp-loyees").unwrap_err();
        assert!(err.to_string().contains('-'));
    }

    #[test]
    fn test_rejects_overlong_identifier() {
        let long = "A".repeat(MAX_IDENTIFIER_LEN + 1);
        assert!(Scope::new(Environment::Dev, long, "s").is_err());
    }

    #[test]
    fn test_accepts_underscore_and_dollar() {
        let scope = Scope::new(Environment::Tst, "raw_zone", "stg$load").unwrap();
        assert_eq!(scope.database(), "RAW_ZONE");
        assert_eq!(scope.schema(), "STG$LOAD");
    }

    #[test]
    fn test_display_is_dotted_path() {
        let scope = Scope::new(Environment::Prd, "sales", "orders").unwrap();
        assert_eq!(scope.to_string(), "PRD.SALES.ORDERS");
    }
}
