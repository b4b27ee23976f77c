//! The closed set of processing domains an entity can be expressed in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Processing domain for entities and events.
///
/// The set is closed: every adapter declares which subset it supports, and
/// cross-domain transformations are only valid between supported domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Attention, working memory, and meta-cognitive state
    Cognitive,
    /// Graph-shaped computation, caching, and raw data structures
    Computational,
    /// Anchored, reference-carrying symbolic structures
    Representational,
}

impl Domain {
    /// All domains, in a stable order
    pub const ALL: [Domain; 3] = [
        Domain::Cognitive,
        Domain::Computational,
        Domain::Representational,
    ];

    /// Lowercase identifier used in metric names, config sections, and
    /// event-type prefixes
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Cognitive => "cognitive",
            Domain::Computational => "computational",
            Domain::Representational => "representational",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cognitive" => Ok(Domain::Cognitive),
            "computational" => Ok(Domain::Computational),
            "representational" => Ok(Domain::Representational),
            _ => Err(UnknownDomain(s.to_string())),
        }
    }
}

/// Parse failure for a domain name that is not in the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown domain: {0}")]
pub struct UnknownDomain(pub String);
