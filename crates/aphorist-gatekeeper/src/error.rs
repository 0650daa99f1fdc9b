//! Gatekeeper error types

use thiserror::Error;

/// Why a piece of user input was rejected
///
/// Messages are written for end users; callers show them as-is and re-prompt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    /// Nothing left after trimming
    #[error("Empty input")]
    EmptyInput,

    /// Trimmed text shorter than the minimum
    #[error("Quote too short (min {min} chars)")]
    TooShort {
        /// Character count of the trimmed text
        length: usize,
        /// Configured minimum
        min: usize,
    },

    /// Trimmed text longer than the maximum
    #[error("Quote too long (max {max} chars)")]
    TooLong {
        /// Character count of the trimmed text
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Text carries too little signal to be a quote
    #[error("Input doesn't appear to be a meaningful quote")]
    LowQuality,
}
