//! Capability Levels
//!
//! Ordered permission tiers. Each level's privilege set is a superset of
//! the previous one, so `Ord` directly encodes the monotone hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::WardenError;

/// An ordered capability tier governing the breadth of privileges a role
/// should hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapabilityLevel {
    /// Consumes curated data products.
    EndUser,
    /// Ad-hoc querying over the full schema.
    Analyst,
    /// Builds objects; owns them in DEV.
    Developer,
    /// Developer plus review/approval surface.
    TeamLeader,
    /// Analyst tooling plus staged-data access.
    DataScientist,
    /// Full administrative tier.
    DbAdmin,
}

impl CapabilityLevel {
    /// All levels, lowest tier first.
    pub const ALL: [CapabilityLevel; 6] = [
        CapabilityLevel::EndUser,
        CapabilityLevel::Analyst,
        CapabilityLevel::Developer,
        CapabilityLevel::TeamLeader,
        CapabilityLevel::DataScientist,
        CapabilityLevel::DbAdmin,
    ];

    /// The upper-case token used in role names.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            CapabilityLevel::EndUser => "ENDUSER",
            CapabilityLevel::Analyst => "ANALYST",
            CapabilityLevel::Developer => "DEVELOPER",
            CapabilityLevel::TeamLeader => "TEAMLEADER",
            CapabilityLevel::DataScientist => "DATASCIENTIST",
            CapabilityLevel::DbAdmin => "DBADMIN",
        }
    }

    /// Whether this level's privilege set contains `other`'s.
    #[must_use]
    pub fn includes(&self, other: CapabilityLevel) -> bool {
        *self >= other
    }
}

impl Display for CapabilityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for CapabilityLevel {
    type Err = WardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('_', "").as_str() {
            "ENDUSER" => Ok(CapabilityLevel::EndUser),
            "ANALYST" => Ok(CapabilityLevel::Analyst),
            "DEVELOPER" => Ok(CapabilityLevel::Developer),
            "TEAMLEADER" => Ok(CapabilityLevel::TeamLeader),
            "DATASCIENTIST" => Ok(CapabilityLevel::DataScientist),
            "DBADMIN" => Ok(CapabilityLevel::DbAdmin),
            _ => Err(WardenError::UnknownCapability {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_is_monotone() {
        for window in CapabilityLevel::ALL.windows(2) {
            assert!(window[1] > window[0]);
            assert!(window[1].includes(window[0]));
            assert!(!window[0].includes(window[1]));
        }
    }

    #[test]
    fn test_level_includes_itself() {
        for level in CapabilityLevel::ALL {
            assert!(level.includes(level));
        }
    }

    #[test]
    fn test_parse_accepts_snake_case() {
        let parsed: CapabilityLevel = "end_user".parse().unwrap();
        assert_eq!(parsed, CapabilityLevel::EndUser);
        let parsed: CapabilityLevel = "DATA_SCIENTIST".parse().unwrap();
        assert_eq!(parsed, CapabilityLevel::DataScientist);
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        let result: Result<CapabilityLevel, _> = "WIZARD".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_tokens_are_distinct() {
        let mut tokens: Vec<_> = CapabilityLevel::ALL.iter().map(|c| c.token()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), CapabilityLevel::ALL.len());
    }
}
