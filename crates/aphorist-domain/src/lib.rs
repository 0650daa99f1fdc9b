//! Aphorist Domain Layer
//!
//! This crate contains the core domain model for Aphorist: the validated quote
//! record, the raw ingestion shape it is built from, and the trait boundaries
//! that the store, LLM and critic crates implement or consume.
//!
//! ## Key Concepts
//!
//! - **QuoteRecord**: An immutable, validated canonical quote with themes
//! - **RawQuote**: The unvalidated shape handed over by corpus ingestion
//! - **AnalysisId**: Time-sortable identifier for a completed critique
//! - **QuoteCorpus / ChatProvider**: Seams to the store and the model endpoint
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Minimal external dependencies (`uuid`, `thiserror`)
//! - Pure business rules only
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod quote;
pub mod traits;

// Re-exports for convenience
pub use analysis::AnalysisId;
pub use quote::{QuoteRecord, RawQuote, RecordValidationError};
pub use traits::{ChatProvider, ChatRequest, Completion, QuoteCorpus};
