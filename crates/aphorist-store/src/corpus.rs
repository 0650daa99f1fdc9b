//! JSON corpus ingestion and export
//!
//! The on-disk format is a single document:
//!
//! ```json
//! { "quotes": [ { "id": "...", "text": "...", "author": "...",
//!                 "tradition": "...", "themes": ["..."], "verified": true } ] }
//! ```

use crate::{LoadPolicy, QuoteStore, StoreError};
use aphorist_domain::RawQuote;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Top-level corpus document
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CorpusDocument {
    /// Quote entries
    #[serde(default)]
    pub quotes: Vec<QuoteEntry>,
}

/// One quote entry as written in the JSON file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteEntry {
    /// Identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Quote body
    #[serde(default)]
    pub text: Option<String>,
    /// Author name
    #[serde(default)]
    pub author: Option<String>,
    /// Tradition label
    #[serde(default)]
    pub tradition: Option<String>,
    /// Theme tags
    #[serde(default)]
    pub themes: Option<Vec<String>>,
    /// Verification flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Attribution note
    #[serde(default)]
    pub attribution_note: Option<String>,
    /// Source work
    #[serde(default)]
    pub source_work: Option<String>,
    /// Year
    #[serde(default)]
    pub year: Option<String>,
}

impl From<QuoteEntry> for RawQuote {
    fn from(entry: QuoteEntry) -> Self {
        RawQuote {
            id: entry.id,
            text: entry.text,
            author: entry.author,
            tradition: entry.tradition,
            themes: entry.themes,
            verified: entry.verified,
            attribution_note: entry.attribution_note,
            source_work: entry.source_work,
            year: entry.year,
        }
    }
}

impl From<RawQuote> for QuoteEntry {
    fn from(raw: RawQuote) -> Self {
        QuoteEntry {
            id: raw.id,
            text: raw.text,
            author: raw.author,
            tradition: raw.tradition,
            themes: raw.themes,
            verified: raw.verified,
            attribution_note: raw.attribution_note,
            source_work: raw.source_work,
            year: raw.year,
        }
    }
}

/// Decode a corpus document into raw records without validating them
pub fn parse_document(json: &str) -> Result<Vec<RawQuote>, StoreError> {
    let document: CorpusDocument = serde_json::from_str(json)?;
    Ok(document.quotes.into_iter().map(RawQuote::from).collect())
}

/// Build a store from a JSON string
pub fn load_from_json_str(json: &str, policy: LoadPolicy) -> Result<QuoteStore, StoreError> {
    let records = parse_document(json)?;
    debug!("Decoded {} raw quote entries", records.len());
    QuoteStore::load_with_policy(records, policy)
}

/// Build a store from a JSON file
pub fn load_from_path<P: AsRef<Path>>(
    path: P,
    policy: LoadPolicy,
) -> Result<QuoteStore, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(StoreError::NotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path)?;
    load_from_json_str(&contents, policy)
}

/// Serialize the whole store back into the corpus document format
pub fn export_json(store: &QuoteStore) -> Result<String, StoreError> {
    let document = CorpusDocument {
        quotes: store
            .all()
            .iter()
            .map(|q| QuoteEntry::from(q.to_raw()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "quotes": [
            {
                "id": "stoic-001",
                "text": "It is not death that a man should fear.",
                "author": "Marcus Aurelius",
                "tradition": "Stoicism",
                "themes": ["death", "fear"]
            },
            {
                "id": "misc-001",
                "text": "Be the change you wish to see.",
                "author": "Mahatma Gandhi",
                "tradition": "Modern",
                "themes": ["change"],
                "verified": false,
                "attribution_note": "paraphrase"
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let store = load_from_json_str(SAMPLE, LoadPolicy::Strict).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.all()[0].verified());
        assert!(!store.all()[1].verified());
        assert_eq!(store.all()[1].attribution_note(), Some("paraphrase"));
    }

    #[test]
    fn test_missing_quotes_key_is_empty_corpus() {
        let result = load_from_json_str("{}", LoadPolicy::Strict);
        assert!(matches!(result, Err(StoreError::EmptyCorpus)));
    }

    #[test]
    fn test_invalid_json() {
        let result = load_from_json_str("{ not json", LoadPolicy::Strict);
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[test]
    fn test_export_reloads_identically() {
        let store = load_from_json_str(SAMPLE, LoadPolicy::Strict).unwrap();
        let exported = export_json(&store).unwrap();
        let reloaded = load_from_json_str(&exported, LoadPolicy::Strict).unwrap();
        assert_eq!(store.all(), reloaded.all());
    }
}
