//! Input validation logic

use crate::{InputRejection, ValidationConfig};
use std::collections::HashSet;

/// Validates free text before it is scored or sent to the model
///
/// Rules are applied in order and the first failure wins:
/// 1. empty after trimming
/// 2. shorter than `min_length`
/// 3. longer than `max_length`
/// 4. low quality: too few distinct characters, or letters-and-whitespace
///    only with too few words
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    config: ValidationConfig,
}

impl InputValidator {
    /// Create a validator with the given thresholds
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `input` and return its trimmed form
    pub fn validate<'a>(&self, input: &'a str) -> Result<&'a str, InputRejection> {
        let cleaned = input.trim();
        if cleaned.is_empty() {
            return Err(InputRejection::EmptyInput);
        }

        let length = cleaned.chars().count();
        if length < self.config.min_length {
            return Err(InputRejection::TooShort {
                length,
                min: self.config.min_length,
            });
        }
        if length > self.config.max_length {
            return Err(InputRejection::TooLong {
                length,
                max: self.config.max_length,
            });
        }

        if self.is_low_quality(cleaned) {
            return Err(InputRejection::LowQuality);
        }

        Ok(cleaned)
    }

    fn is_low_quality(&self, text: &str) -> bool {
        let distinct: HashSet<char> = text.chars().collect();
        if distinct.len() < self.config.min_distinct_chars {
            return true;
        }

        let letters_only = text
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace());
        letters_only && text.split_whitespace().count() < self.config.min_words
    }
}
