//! Analysis identifiers

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a completed analysis, based on UUIDv7
///
/// UUIDv7 keeps history entries chronologically sortable without a
/// separate sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnalysisId(u128);

impl AnalysisId {
    /// Generate a new UUIDv7-based AnalysisId
    ///
    /// # Examples
    ///
    /// ```
    /// use aphorist_domain::AnalysisId;
    ///
    /// let id = AnalysisId::new();
    /// let parsed: AnalysisId = id.to_string().parse().unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Creation time in Unix milliseconds, read back from the id
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl FromStr for AnalysisId {
    type Err = String;

    /// Parses the hyphenated form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid analysis id '{}': {}", s, e))
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}
