//! Hugging Face Inference Provider
//!
//! Talks to the OpenAI-compatible chat completions route exposed by the
//! Hugging Face inference router (and by most self-hosted inference servers).
//!
//! # Features
//!
//! - Bearer-token authentication
//! - Retry with exponential backoff on transport and server errors
//! - Per-request timeout
//!
//! # Examples
//!
//! ```no_run
//! use aphorist_llm::HuggingFaceProvider;
//!
//! let provider = HuggingFaceProvider::new(
//!     "https://router.huggingface.co",
//!     "Qwen/Qwen2.5-7B-Instruct",
//!     Some("hf_xxx".to_string()),
//! )
//! .unwrap();
//! ```

use crate::LlmError;
use aphorist_domain::{ChatProvider, ChatRequest, Completion};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default inference endpoint
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co";

/// Default chat model
pub const DEFAULT_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";

/// Default timeout for one HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Chat completions provider for Hugging Face hosted models
pub struct HuggingFaceProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

impl HuggingFaceProvider {
    /// Create a provider
    ///
    /// `api_key` is sent as a bearer token when present.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit per-request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        // Each sync call runs on its own short-lived runtime, so pooled
        // connections would outlive the runtime that owns them.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }

    /// Send a chat completion request
    ///
    /// # Errors
    ///
    /// - `Unauthorized` on 401/403
    /// - `ModelNotAvailable` on 404
    /// - `RateLimitExceeded` on 429
    /// - `InvalidResponse` if the body is not a chat completion
    /// - `Communication` once retries are exhausted
    pub async fn chat(&self, request: &ChatRequest) -> Result<Completion, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            stream: false,
        };
        let url = self.url();

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            let mut builder = self.client.post(&url).json(&body);
            if let Some(key) = &self.api_key {
                builder = builder.bearer_auth(key);
            }

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<ChatCompletionResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            })?;
                        return into_completion(parsed);
                    }

                    match status {
                        StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.model.clone()))
                        }
                        StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimitExceeded),
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            return Err(LlmError::Unauthorized(format!("HTTP {}", status)))
                        }
                        _ => {}
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Inference request failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn into_completion(response: ChatCompletionResponse) -> Result<Completion, LlmError> {
    let total_tokens = response.usage.and_then(|u| u.total_tokens);
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    debug!("Received {} chars, {:?} tokens", content.len(), total_tokens);
    Ok(Completion {
        content,
        total_tokens,
    })
}

impl ChatProvider for HuggingFaceProvider {
    type Error = LlmError;

    fn complete(&self, request: &ChatRequest) -> Result<Completion, Self::Error> {
        // Blocking wrapper; callers inside async code go through spawn_blocking
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
        runtime.block_on(self.chat(request))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
