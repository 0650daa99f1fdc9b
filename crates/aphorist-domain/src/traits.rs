//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Implementations live in other crates.

use crate::QuoteRecord;

/// Read access to a loaded quote corpus
///
/// Implemented by the storage layer (aphorist-store). The query engine is
/// generic over this trait and propagates `Self::Error` untouched.
pub trait QuoteCorpus {
    /// Error type for corpus access
    type Error;

    /// All records in their original insertion order
    fn records(&self) -> Result<&[QuoteRecord], Self::Error>;
}

/// A single chat-style request to a language model
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System instructions
    pub system: String,

    /// User message
    pub user: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// A language model's reply
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text (may or may not be strict JSON)
    pub content: String,

    /// Total tokens reported by the endpoint, if any
    pub total_tokens: Option<u64>,
}

impl Completion {
    /// Completion without usage information
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            total_tokens: None,
        }
    }
}

/// Trait for chat-completion providers
///
/// Implemented by the infrastructure layer (aphorist-llm)
pub trait ChatProvider {
    /// Error type for LLM operations
    type Error;

    /// Send one system + user exchange and return the reply
    fn complete(&self, request: &ChatRequest) -> Result<Completion, Self::Error>;

    /// Model identifier used for this provider
    fn model_name(&self) -> &str;
}
