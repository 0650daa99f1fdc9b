//! Aphorist Critic
//!
//! Turns a user-submitted quote into a structured philosophical critique and
//! attaches theme-matched canonical quotes from the corpus.
//!
//! # Architecture
//!
//! ```text
//! Quote → InputValidator → RateLimiter → LLM → parse_critique → Analysis
//!                                                   ↑
//!                                      QuoteStore ranking (find_similar)
//! ```
//!
//! # Key Features
//!
//! - **Gated model calls**: invalid input never reaches the limiter or the model
//! - **Tone modes and languages**: localized prompt templates
//! - **Forgiving parsing**: fenced or prose-wrapped JSON is accepted; anything
//!   else degrades to a fallback critique instead of failing the request
//! - **Session state**: analysis history and usage counters
//!
//! # Example Usage
//!
//! ```no_run
//! use aphorist_critic::{Critic, CriticConfig};
//! use aphorist_llm::MockProvider;
//! use aphorist_store::corpus;
//! use aphorist_store::LoadPolicy;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = corpus::load_from_path("data/quotes_db.json", LoadPolicy::Strict)?;
//! let llm = MockProvider::new(r#"{"surface_claim": "..."}"#);
//!
//! let critic = Critic::new(llm, Arc::new(store), CriticConfig::default())?;
//! let analysis = critic.analyze("Whatever does not kill me makes me stronger.").await?;
//!
//! println!("{}", analysis.critique.surface_claim);
//! for similar in &analysis.similar {
//!     println!("{} {}", similar.text, similar.attribution);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod critic;
mod error;
mod parser;
mod prompt;
mod types;


pub use config::CriticConfig;
pub use critic::Critic;
pub use error::{CriticError, ResponseParseError};
pub use parser::{extract_json, parse_critique, parse_object};
pub use prompt::{Language, PromptBuilder, ToneMode};
pub use types::{Analysis, AnchorQuote, Critique, SimilarQuote, Usage};
