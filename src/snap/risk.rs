//! Risk levels of snap channels

use std::fmt;

use tracing::warn;

/// Stability tier of a channel within a track
///
/// Ordered by rank: `Latest` (unranked) < `Edge` < `Beta` < `Candidate` < `Stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Risk {
    /// Rolling/unranked tier, rank 0
    Latest,
    Edge,
    Beta,
    Candidate,
    Stable,
}

impl Risk {
    /// Numeric rank used when ordering channels (stable=4 ... latest=0)
    pub fn rank(&self) -> u8 {
        match self {
            Risk::Latest => 0,
            Risk::Edge => 1,
            Risk::Beta => 2,
            Risk::Candidate => 3,
            Risk::Stable => 4,
        }
    }

    /// Returns the string representation of the risk level
    pub fn as_str(&self) -> &'static str {
        match self {
            Risk::Latest => "latest",
            Risk::Edge => "edge",
            Risk::Beta => "beta",
            Risk::Candidate => "candidate",
            Risk::Stable => "stable",
        }
    }

    /// Parse a risk as reported by the store.
    ///
    /// Unknown risk strings are accepted as the unranked tier so a store-side
    /// addition never fails a whole check.
    pub fn from_store(risk: &str) -> Self {
        risk.parse().unwrap_or_else(|_| {
            warn!("Unknown channel risk {:?}, treating it as unranked", risk);
            Risk::Latest
        })
    }
}

impl std::str::FromStr for Risk {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Risk::Latest),
            "edge" => Ok(Risk::Edge),
            "beta" => Ok(Risk::Beta),
            "candidate" => Ok(Risk::Candidate),
            "stable" => Ok(Risk::Stable),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
