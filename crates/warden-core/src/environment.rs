//! Platform Environments
//!
//! The five environments a data domain is deployed to. Only `DEV` is
//! write-eligible: every other environment is read-oriented, with object
//! ownership held by the centralized operations role.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::WardenError;

/// A platform environment.
///
/// Ordering follows the promotion path DEV → TST → UAT → PPE → PRD.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    /// Development - the only environment with write permission groups.
    Dev,
    /// Test.
    Tst,
    /// User acceptance testing.
    Uat,
    /// Pre-production.
    Ppe,
    /// Production.
    Prd,
}

impl Environment {
    /// All environments in promotion order.
    pub const ALL: [Environment; 5] = [
        Environment::Dev,
        Environment::Tst,
        Environment::Uat,
        Environment::Ppe,
        Environment::Prd,
    ];

    /// The canonical upper-case code used in role names.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Tst => "TST",
            Environment::Uat => "UAT",
            Environment::Ppe => "PPE",
            Environment::Prd => "PRD",
        }
    }

    /// Whether write permission groups and developer ownership apply here.
    #[must_use]
    pub fn is_write_eligible(&self) -> bool {
        matches!(self, Environment::Dev)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Environment {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEV" => Ok(Environment::Dev),
            "TST" => Ok(Environment::Tst),
            "UAT" => Ok(Environment::Uat),
            "PPE" => Ok(Environment::Ppe),
            "PRD" => Ok(Environment::Prd),
            _ => Err(WardenError::UnknownEnvironment {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        for env in Environment::ALL {
            let parsed: Environment = env.code().parse().unwrap();
            assert_eq!(parsed, env);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let parsed: Environment = "prd".parse().unwrap();
        assert_eq!(parsed, Environment::Prd);
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let result: Result<Environment, _> = "QA".parse();
        assert_eq!(
            result.unwrap_err(),
            WardenError::UnknownEnvironment {
                value: "QA".to_string()
            }
        );
    }

    #[test]
    fn test_only_dev_is_write_eligible() {
        for env in Environment::ALL {
            assert_eq!(env.is_write_eligible(), env == Environment::Dev);
        }
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(Environment::Uat.to_string(), "UAT");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Environment::Ppe).unwrap();
        assert_eq!(json, "\"PPE\"");
    }
}
