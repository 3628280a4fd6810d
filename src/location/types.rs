//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A named campus location. Immutable once loaded into a gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusLocation {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternate spellings used only for matching, never displayed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl CampusLocation {
    pub fn new(id: &str, name: &str, lat: f64, lng: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            lat,
            lng,
            description: None,
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn display_line(&self) -> String {
        format!(
            "\u{1F4CD} {} [{}]\n  \u{1F4D0} {}",
            self.name,
            self.id,
            super::gazetteer::format_coords(self.lat, self.lng)
        )
    }
}

/// Which rule of the precedence chain produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Library,
    ExactName,
    ExactAlias,
    RawName,
    Containment,
    WordPrefix,
    EngineeringHeuristic,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => write!(f, "library"),
            Self::ExactName => write!(f, "exact-name"),
            Self::ExactAlias => write!(f, "exact-alias"),
            Self::RawName => write!(f, "raw-name"),
            Self::Containment => write!(f, "containment"),
            Self::WordPrefix => write!(f, "word-prefix"),
            Self::EngineeringHeuristic => write!(f, "engineering-heuristic"),
        }
    }
}

/// Outcome of resolving a free-text query: one location or nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'g> {
    Matched {
        location: &'g CampusLocation,
        rule: MatchRule,
    },
    Unresolved,
}

impl<'g> MatchResult<'g> {
    pub fn location(&self) -> Option<&'g CampusLocation> {
        match self {
            Self::Matched { location, .. } => Some(location),
            Self::Unresolved => None,
        }
    }

    pub fn id(&self) -> Option<&'g str> {
        self.location().map(|l| l.id.as_str())
    }

    pub fn rule(&self) -> Option<MatchRule> {
        match self {
            Self::Matched { rule, .. } => Some(*rule),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Apply a caller-chosen default when nothing matched.
    pub fn or_default(self, default: &'g CampusLocation) -> &'g CampusLocation {
        self.location().unwrap_or(default)
    }
}

/// Errors raised while building or loading a gazetteer.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("gazetteer contains no locations")]
    EmptyGazetteer,

    #[error("duplicate location id '{0}'")]
    DuplicateId(String),

    #[error("location '{id}' has invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { id: String, lat: f64, lng: f64 },

    #[error("cannot read gazetteer: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid gazetteer JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_accessors() {
        let loc = CampusLocation::new("su", "Student Union", 32.9869, -96.7491);
        let hit = MatchResult::Matched { location: &loc, rule: MatchRule::ExactName };
        assert_eq!(hit.id(), Some("su"));
        assert_eq!(hit.rule(), Some(MatchRule::ExactName));
        assert!(hit.is_resolved());

        let miss = MatchResult::Unresolved;
        assert_eq!(miss.id(), None);
        assert_eq!(miss.or_default(&loc).id, "su");
    }

    #[test]
    fn test_location_json_skips_empty_fields() {
        let loc = CampusLocation::new("su", "Student Union", 32.9869, -96.7491);
        let json = serde_json::to_string(&loc).unwrap();
        assert!(!json.contains("aliases"));
        assert!(!json.contains("description"));

        let back: CampusLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);

        let described = loc.with_aliases(&["SU"]).with_description("Food court");
        let json = serde_json::to_value(&described).unwrap();
        assert_eq!(json["description"], "Food court");
        assert_eq!(json["aliases"][0], "SU");
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(MatchRule::WordPrefix.to_string(), "word-prefix");
        assert_eq!(
            serde_json::to_string(&MatchRule::EngineeringHeuristic).unwrap(),
            "\"engineering_heuristic\""
        );
    }
}
