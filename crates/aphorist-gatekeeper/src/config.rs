//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Thresholds for input validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum trimmed length in characters
    pub min_length: usize,

    /// Maximum trimmed length in characters
    pub max_length: usize,

    /// Minimum number of distinct characters
    pub min_distinct_chars: usize,

    /// Minimum word count for text made only of letters and whitespace
    pub min_words: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_length: 5,
            max_length: 500,
            min_distinct_chars: 5,
            min_words: 3,
        }
    }
}

impl ValidationConfig {
    /// Check that the thresholds are coherent
    pub fn validate(&self) -> Result<(), String> {
        if self.max_length == 0 {
            return Err("max_length must be greater than 0".to_string());
        }
        if self.min_length > self.max_length {
            return Err("min_length cannot exceed max_length".to_string());
        }
        Ok(())
    }
}
