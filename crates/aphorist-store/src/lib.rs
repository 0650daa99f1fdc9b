//! Aphorist Storage Layer
//!
//! Holds the canonical quote corpus in memory and answers lookups against it.
//!
//! # Architecture
//!
//! - [`QuoteStore`]: validated records, populated once at startup, read-only after
//! - [`query`]: theme-based ranking of corpus records against free text
//! - [`corpus`]: JSON ingestion and export (`{"quotes": [...]}` documents)
//! - [`SharedCorpus`]: atomic snapshot swap for hot reloads
//!
//! # Examples
//!
//! ```
//! use aphorist_domain::RawQuote;
//! use aphorist_store::QuoteStore;
//!
//! let store = QuoteStore::load(vec![RawQuote {
//!     id: Some("q1".into()),
//!     text: Some("Know thyself.".into()),
//!     author: Some("Socrates".into()),
//!     tradition: Some("Classical Greek".into()),
//!     themes: Some(vec!["self-knowledge".into()]),
//!     ..Default::default()
//! }])
//! .unwrap();
//! assert_eq!(store.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod corpus;
pub mod query;
mod shared;

use aphorist_domain::{QuoteCorpus, QuoteRecord, RawQuote, RecordValidationError};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

pub use query::{find_similar, QueryOptions, ScoredQuote, DEFAULT_TOP_K};
pub use shared::SharedCorpus;

/// Errors that can occur while building or loading a corpus
#[derive(Error, Debug)]
pub enum StoreError {
    /// No valid records were supplied
    #[error("Corpus contains no valid quotes")]
    EmptyCorpus,

    /// A record violated the quote invariants
    #[error("Quote {index}: {source}")]
    RecordValidation {
        /// Position of the offending record in the input
        index: usize,
        /// The violated invariant
        #[source]
        source: RecordValidationError,
    },

    /// Corpus file not found
    #[error("Corpus file not found: {0}")]
    NotFound(String),

    /// I/O error while reading or writing a corpus file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("Invalid corpus JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do with records that fail validation during a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Abort the whole load on the first invalid record
    #[default]
    Strict,
    /// Drop invalid records with a warning and keep the rest
    SkipInvalid,
}

/// Non-fatal integrity findings about a loaded corpus
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusWarning {
    /// Two records share an id
    DuplicateId {
        /// Position of the later record
        index: usize,
        /// The repeated id
        id: String,
    },
    /// A record is marked unverified
    Unverified {
        /// Position of the record
        index: usize,
        /// First 50 characters of the quote text
        preview: String,
        /// Attribution note, if any
        note: Option<String>,
    },
    /// A record was dropped under [`LoadPolicy::SkipInvalid`]
    Skipped {
        /// Position of the dropped record in the input
        index: usize,
        /// Why it was dropped
        reason: RecordValidationError,
    },
}

impl fmt::Display for CorpusWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusWarning::DuplicateId { index, id } => {
                write!(f, "Quote {}: Duplicate ID '{}'", index, id)
            }
            CorpusWarning::Unverified { index, preview, note } => write!(
                f,
                "Quote {}: '{}...' is unverified ({})",
                index,
                preview,
                note.as_deref().unwrap_or("no note")
            ),
            CorpusWarning::Skipped { index, reason } => {
                write!(f, "Quote {}: skipped ({})", index, reason)
            }
        }
    }
}

/// Field selector for keyword search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// Quote body
    #[default]
    Text,
    /// Author name
    Author,
    /// Tradition label
    Tradition,
    /// Any theme tag
    Themes,
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(SearchField::Text),
            "author" => Ok(SearchField::Author),
            "tradition" => Ok(SearchField::Tradition),
            "themes" | "theme" => Ok(SearchField::Themes),
            _ => Err(format!("Invalid search field: {}", s)),
        }
    }
}

/// Snapshot of corpus statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    /// Number of records
    pub total_quotes: usize,
    /// Records marked verified
    pub verified_quotes: usize,
    /// Records marked unverified
    pub unverified_quotes: usize,
    /// Distinct traditions
    pub total_traditions: usize,
    /// Distinct themes
    pub total_themes: usize,
    /// Distinct authors
    pub total_authors: usize,
    /// Sorted tradition names
    pub traditions: Vec<String>,
}

/// In-memory store of validated quote records
///
/// Populated once by [`QuoteStore::load`] and never mutated afterwards, so a
/// store can be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    quotes: Vec<QuoteRecord>,
    warnings: Vec<CorpusWarning>,
}

impl QuoteStore {
    /// Build a store, aborting on the first invalid record
    pub fn load(records: Vec<RawQuote>) -> Result<Self, StoreError> {
        Self::load_with_policy(records, LoadPolicy::Strict)
    }

    /// Build a store under an explicit policy for invalid records
    ///
    /// Fails with [`StoreError::EmptyCorpus`] when no valid record remains.
    /// Duplicate ids and unverified records are logged and kept.
    pub fn load_with_policy(
        records: Vec<RawQuote>,
        policy: LoadPolicy,
    ) -> Result<Self, StoreError> {
        let mut quotes = Vec::with_capacity(records.len());
        let mut warnings = Vec::new();

        for (index, raw) in records.into_iter().enumerate() {
            match QuoteRecord::new(raw) {
                Ok(quote) => quotes.push(quote),
                Err(source) => match policy {
                    LoadPolicy::Strict => {
                        return Err(StoreError::RecordValidation { index, source });
                    }
                    LoadPolicy::SkipInvalid => {
                        warn!("Skipping quote {}: {}", index, source);
                        warnings.push(CorpusWarning::Skipped {
                            index,
                            reason: source,
                        });
                    }
                },
            }
        }

        if quotes.is_empty() {
            return Err(StoreError::EmptyCorpus);
        }

        warnings.extend(integrity_warnings(&quotes));
        for warning in &warnings {
            warn!("{}", warning);
        }

        info!("Loaded {} philosophy quotes", quotes.len());

        Ok(Self { quotes, warnings })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Always false for a successfully loaded store
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// All records in insertion order
    pub fn all(&self) -> &[QuoteRecord] {
        &self.quotes
    }

    /// Record at a 0-based position
    pub fn get_by_index(&self, index: usize) -> Option<&QuoteRecord> {
        self.quotes.get(index)
    }

    /// First record with the given id
    pub fn get_by_id(&self, id: &str) -> Option<&QuoteRecord> {
        self.quotes.iter().find(|q| q.id() == id)
    }

    /// Records whose tradition equals `name`, ignoring case
    pub fn by_tradition(&self, name: &str) -> Vec<&QuoteRecord> {
        let name = name.to_lowercase();
        self.quotes
            .iter()
            .filter(|q| q.tradition().to_lowercase() == name)
            .collect()
    }

    /// Records carrying the theme `name`, ignoring case
    pub fn by_theme(&self, name: &str) -> Vec<&QuoteRecord> {
        self.quotes.iter().filter(|q| q.has_theme(name)).collect()
    }

    /// Records whose author contains `fragment`, ignoring case
    pub fn by_author(&self, fragment: &str) -> Vec<&QuoteRecord> {
        let fragment = fragment.to_lowercase();
        self.quotes
            .iter()
            .filter(|q| q.author().to_lowercase().contains(&fragment))
            .collect()
    }

    /// Records with the given verification status
    pub fn by_verification(&self, verified: bool) -> Vec<&QuoteRecord> {
        self.quotes
            .iter()
            .filter(|q| q.verified() == verified)
            .collect()
    }

    /// Case-insensitive keyword search in one field
    pub fn search(&self, keyword: &str, field: SearchField) -> Vec<&QuoteRecord> {
        let keyword = keyword.to_lowercase();
        self.quotes
            .iter()
            .filter(|q| match field {
                SearchField::Text => q.text().to_lowercase().contains(&keyword),
                SearchField::Author => q.author().to_lowercase().contains(&keyword),
                SearchField::Tradition => q.tradition().to_lowercase().contains(&keyword),
                SearchField::Themes => q
                    .themes()
                    .iter()
                    .any(|t| t.to_lowercase().contains(&keyword)),
            })
            .collect()
    }

    /// Top matches for free text using the default query options
    pub fn find_similar(&self, text: &str, options: QueryOptions) -> Vec<ScoredQuote<'_>> {
        match query::find_similar(self, text, options) {
            Ok(matches) => matches,
            Err(never) => match never {},
        }
    }

    /// Sorted, de-duplicated tradition names
    pub fn distinct_traditions(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| q.tradition().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, de-duplicated theme tags
    pub fn distinct_themes(&self) -> Vec<String> {
        self.quotes
            .iter()
            .flat_map(|q| q.themes().iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, de-duplicated author names
    pub fn distinct_authors(&self) -> Vec<String> {
        self.quotes
            .iter()
            .map(|q| q.author().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Compute corpus statistics
    pub fn stats(&self) -> CorpusStats {
        let verified_quotes = self.quotes.iter().filter(|q| q.verified()).count();
        let traditions = self.distinct_traditions();

        CorpusStats {
            total_quotes: self.quotes.len(),
            verified_quotes,
            unverified_quotes: self.quotes.len() - verified_quotes,
            total_traditions: traditions.len(),
            total_themes: self.distinct_themes().len(),
            total_authors: self.distinct_authors().len(),
            traditions,
        }
    }

    /// Integrity warnings collected at load time
    pub fn warnings(&self) -> &[CorpusWarning] {
        &self.warnings
    }

    /// Numbered `"{n}. {text} — {author}"` lines, optionally truncated
    pub fn as_text_list(&self, limit: Option<usize>) -> String {
        let take = limit.unwrap_or(self.quotes.len());
        self.quotes
            .iter()
            .take(take)
            .enumerate()
            .map(|(i, q)| format!("{}. {} — {}", i + 1, q.text(), q.author()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl QuoteCorpus for QuoteStore {
    type Error = Infallible;

    fn records(&self) -> Result<&[QuoteRecord], Self::Error> {
        Ok(&self.quotes)
    }
}

/// Duplicate-id and unverified-entry findings, in corpus order
fn integrity_warnings(quotes: &[QuoteRecord]) -> Vec<CorpusWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (index, quote) in quotes.iter().enumerate() {
        if !seen.insert(quote.id()) {
            warnings.push(CorpusWarning::DuplicateId {
                index,
                id: quote.id().to_string(),
            });
        }

        if !quote.verified() {
            warnings.push(CorpusWarning::Unverified {
                index,
                preview: quote.text().chars().take(50).collect(),
                note: quote.attribution_note().map(str::to_string),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, author: &str, tradition: &str, themes: &[&str]) -> RawQuote {
        RawQuote {
            id: Some(id.to_string()),
            text: Some(format!("A saying by {}", author)),
            author: Some(author.to_string()),
            tradition: Some(tradition.to_string()),
            themes: Some(themes.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(QuoteStore::load(vec![]), Err(StoreError::EmptyCorpus)));
    }

    #[test]
    fn test_skip_invalid_keeps_valid_records() {
        let mut bad = raw("q2", "Epictetus", "Stoicism", &["control"]);
        bad.author = None;

        let store = QuoteStore::load_with_policy(
            vec![raw("q1", "Seneca", "Stoicism", &["time"]), bad],
            LoadPolicy::SkipInvalid,
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.warnings()[0],
            CorpusWarning::Skipped { index: 1, .. }
        ));
    }

    #[test]
    fn test_skip_invalid_with_nothing_left_is_empty_corpus() {
        let mut bad = raw("q1", "Seneca", "Stoicism", &["time"]);
        bad.themes = Some(vec![]);

        let result = QuoteStore::load_with_policy(vec![bad], LoadPolicy::SkipInvalid);
        assert!(matches!(result, Err(StoreError::EmptyCorpus)));
    }

    #[test]
    fn test_warning_display() {
        let warning = CorpusWarning::Unverified {
            index: 3,
            preview: "Be the change".to_string(),
            note: None,
        };
        assert_eq!(
            warning.to_string(),
            "Quote 3: 'Be the change...' is unverified (no note)"
        );
    }

    #[test]
    fn test_search_field_parse() {
        assert_eq!("Author".parse::<SearchField>(), Ok(SearchField::Author));
        assert_eq!("theme".parse::<SearchField>(), Ok(SearchField::Themes));
        assert!("year".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_as_text_list_limit() {
        let store = QuoteStore::load(vec![
            raw("q1", "Seneca", "Stoicism", &["time"]),
            raw("q2", "Laozi", "Taoism", &["nature"]),
        ])
        .unwrap();

        assert_eq!(store.as_text_list(Some(1)), "1. A saying by Seneca — Seneca");
        assert_eq!(store.as_text_list(None).lines().count(), 2);
    }
}
