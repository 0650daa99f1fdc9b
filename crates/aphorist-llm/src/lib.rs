//! Aphorist LLM Provider Layer
//!
//! Implementations of the `ChatProvider` trait from `aphorist-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `HuggingFaceProvider`: OpenAI-compatible chat completions over HTTP
//!
//! # Examples
//!
//! ```
//! use aphorist_domain::{ChatProvider, ChatRequest};
//! use aphorist_llm::MockProvider;
//!
//! let provider = MockProvider::new(r#"{"surface_claim": "ok"}"#);
//! let request = ChatRequest {
//!     system: "Return JSON".into(),
//!     user: "Fortune favors the bold.".into(),
//!     max_tokens: 500,
//! };
//! let reply = provider.complete(&request).unwrap();
//! assert_eq!(reply.content, r#"{"surface_claim": "ok"}"#);
//! ```

#![warn(missing_docs)]

pub mod huggingface;

use aphorist_domain::{ChatProvider, ChatRequest, Completion};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use huggingface::HuggingFaceProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the endpoint
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Endpoint-side rate limit
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Missing or rejected credentials
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<String, MockReply>,
    call_count: usize,
    last_request: Option<ChatRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured replies keyed by the user message, without any
/// network calls. Clones share state, so a test can keep a handle to inspect
/// calls made through another clone.
///
/// ```
/// use aphorist_domain::{ChatProvider, ChatRequest};
/// use aphorist_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("quote one", "reply one");
///
/// let request = ChatRequest { system: String::new(), user: "quote one".into(), max_tokens: 10 };
/// assert_eq!(provider.complete(&request).unwrap().content, "reply one");
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    tokens_per_call: Option<u64>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed reply for every request
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            tokens_per_call: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Report this many tokens as usage on every reply
    pub fn with_usage(mut self, tokens: u64) -> Self {
        self.tokens_per_call = Some(tokens);
        self
    }

    /// Add a specific reply for a given user message
    pub fn add_response(&mut self, user: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .replies
            .insert(user.into(), MockReply::Text(response.into()));
    }

    /// Fail requests carrying this user message
    pub fn add_error(&mut self, user: impl Into<String>) {
        self.lock().replies.insert(user.into(), MockReply::Error);
    }

    /// Number of `complete` calls so far
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.lock().call_count = 0;
    }

    /// Most recent request received
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.lock().last_request.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ChatProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &ChatRequest) -> Result<Completion, Self::Error> {
        let mut state = self.lock();
        state.call_count += 1;
        state.last_request = Some(request.clone());

        let content = match state.replies.get(&request.user) {
            Some(MockReply::Error) => return Err(LlmError::Other("Mock error".to_string())),
            Some(MockReply::Text(text)) => text.clone(),
            None => self.default_response.clone(),
        };

        Ok(Completion {
            content,
            total_tokens: self.tokens_per_call,
        })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRITIQUE: &str = r#"{"surface_claim": "Suffering is optional."}"#;

    fn request(user: &str) -> ChatRequest {
        ChatRequest {
            system: "You are a philosophical critic.".to_string(),
            user: user.to_string(),
            max_tokens: 500,
        }
    }

    #[test]
    fn test_fixed_reply() {
        let provider = MockProvider::new(CRITIQUE);
        let reply = provider.complete(&request("Pain is inevitable.")).unwrap();
        assert_eq!(reply.content, CRITIQUE);
        assert_eq!(reply.total_tokens, None);
        assert_eq!(provider.model_name(), "mock");
    }

    #[test]
    fn test_replies_keyed_by_quote() {
        let mut provider = MockProvider::default();
        provider.add_response("Know thyself.", "reply about self-knowledge");
        provider.add_response("Carpe diem.", "reply about time");

        assert_eq!(
            provider.complete(&request("Carpe diem.")).unwrap().content,
            "reply about time"
        );
        assert_eq!(
            provider.complete(&request("Know thyself.")).unwrap().content,
            "reply about self-knowledge"
        );
        // Keys match the whole user message only
        assert_eq!(
            provider.complete(&request("Know thyself")).unwrap().content,
            "Default mock response"
        );
    }

    #[test]
    fn test_failing_quote_still_counts() {
        let mut provider = MockProvider::new(CRITIQUE);
        provider.add_error("Everything happens for a reason.");

        let result = provider.complete(&request("Everything happens for a reason."));
        assert!(matches!(result, Err(LlmError::Other(_))));
        assert_eq!(provider.call_count(), 1);
        assert_eq!(
            provider.last_request().unwrap().user,
            "Everything happens for a reason."
        );
    }

    #[test]
    fn test_usage_reported_per_call() {
        let provider = MockProvider::new(CRITIQUE).with_usage(120);
        let first = provider.complete(&request("one")).unwrap();
        let second = provider.complete(&request("two")).unwrap();

        assert_eq!(first.total_tokens, Some(120));
        assert_eq!(second.total_tokens, Some(120));
        assert_eq!(provider.last_request().unwrap().max_tokens, 500);
    }

    #[test]
    fn test_handles_share_counters() {
        let provider = MockProvider::new(CRITIQUE);
        let observer = provider.clone();
        assert!(observer.last_request().is_none());

        provider.complete(&request("one")).unwrap();
        provider.complete(&request("two")).unwrap();
        assert_eq!(observer.call_count(), 2);

        observer.reset_call_count();
        assert_eq!(provider.call_count(), 0);
        assert_eq!(provider.last_request().unwrap().user, "two");
    }
}
