//! Error types for the Critic

use aphorist_gatekeeper::InputRejection;
use thiserror::Error;

/// Errors that can occur during a critique
#[derive(Error, Debug)]
pub enum CriticError {
    /// Input failed validation
    #[error("{0}")]
    Rejected(#[from] InputRejection),

    /// Too many model calls in the current window
    #[error("Rate limit exceeded. Slow down.")]
    RateLimited,

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Model call did not finish in time
    #[error("Model request timed out after {0}s")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a model reply could not be read as a critique
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseParseError {
    /// Reply was blank
    #[error("Empty model response")]
    Empty,

    /// No `{ ... }` span in the reply
    #[error("No JSON object found in model response")]
    NoJsonObject,

    /// The candidate JSON did not decode
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Valid JSON, but not an object
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}
