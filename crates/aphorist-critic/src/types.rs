//! Critique and analysis types

use crate::prompt::{Language, ToneMode};
use aphorist_domain::AnalysisId;
use aphorist_store::ScoredQuote;
use serde::{Deserialize, Deserializer, Serialize};

/// Canonical quote the model offers as an anchor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorQuote {
    /// Quote text
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,

    /// Attributed author
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,

    /// Philosophical tradition
    #[serde(deserialize_with = "lenient_string")]
    pub tradition: String,
}

impl AnchorQuote {
    /// True when the model supplied nothing
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.author.is_empty() && self.tradition.is_empty()
    }
}

/// Structured critique returned by the model
///
/// Missing or `null` fields decode as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Critique {
    /// One-sentence summary of the literal claim
    #[serde(deserialize_with = "lenient_string")]
    pub surface_claim: String,

    /// The logical gap or oversimplification
    #[serde(deserialize_with = "lenient_string")]
    pub hidden_assumption: String,

    /// Traditions the critique draws on
    #[serde(deserialize_with = "lenient_string_list")]
    pub philosophical_grounding: Vec<String>,

    /// A more defensible rewording
    #[serde(deserialize_with = "lenient_string")]
    pub revised_quote: String,

    /// Related canonical quote
    #[serde(deserialize_with = "lenient_anchor")]
    pub anchor_quote: AnchorQuote,
}

impl Critique {
    /// Critique used when the reply is not JSON: the raw text becomes the surface claim
    pub fn fallback(raw: &str) -> Self {
        Self {
            surface_claim: raw.to_string(),
            ..Default::default()
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_anchor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AnchorQuote, D::Error> {
    Ok(Option::<AnchorQuote>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a list of strings, a single string, or null
fn lenient_string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) if item.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

/// Owned copy of a ranked corpus match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarQuote {
    /// Corpus id
    pub id: String,
    /// Quote text
    pub text: String,
    /// Author
    pub author: String,
    /// Tradition
    pub tradition: String,
    /// Themes
    pub themes: Vec<String>,
    /// Verification flag
    pub verified: bool,
    /// Rendered attribution line
    pub attribution: String,
    /// Number of matching themes
    pub score: usize,
}

impl From<ScoredQuote<'_>> for SimilarQuote {
    fn from(scored: ScoredQuote<'_>) -> Self {
        let quote = scored.quote;
        Self {
            id: quote.id().to_string(),
            text: quote.text().to_string(),
            author: quote.author().to_string(),
            tradition: quote.tradition().to_string(),
            themes: quote.themes().to_vec(),
            verified: quote.verified(),
            attribution: quote.attribution(),
            score: scored.score,
        }
    }
}

/// One completed critique
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Time-sortable identifier
    pub id: AnalysisId,

    /// Validated, trimmed input
    pub input_quote: String,

    /// Model critique (or the fallback)
    pub critique: Critique,

    /// Ranked corpus matches
    pub similar: Vec<SimilarQuote>,

    /// Tone used
    pub mode: ToneMode,

    /// Response language requested
    pub language: Language,

    /// Unix seconds
    pub created_at: u64,

    /// False when the reply could not be parsed and the fallback was used
    pub parsed: bool,
}

/// Model usage counters for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Completed model calls
    pub api_calls: u64,

    /// Tokens reported by the endpoint
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critique_defaults_missing_fields() {
        let critique: Critique = serde_json::from_str(r#"{"surface_claim": "x"}"#).unwrap();
        assert_eq!(critique.surface_claim, "x");
        assert!(critique.hidden_assumption.is_empty());
        assert!(critique.philosophical_grounding.is_empty());
        assert!(critique.anchor_quote.is_empty());
    }

    #[test]
    fn test_critique_tolerates_nulls_and_scalars() {
        let critique: Critique = serde_json::from_str(
            r#"{"surface_claim": null, "philosophical_grounding": "Stoicism", "anchor_quote": null}"#,
        )
        .unwrap();
        assert_eq!(critique.surface_claim, "");
        assert_eq!(critique.philosophical_grounding, vec!["Stoicism"]);
        assert_eq!(critique.anchor_quote, AnchorQuote::default());
    }

    #[test]
    fn test_empty_anchor_object() {
        let critique: Critique = serde_json::from_str(r#"{"anchor_quote": {}}"#).unwrap();
        assert!(critique.anchor_quote.is_empty());
    }

    #[test]
    fn test_fallback() {
        let critique = Critique::fallback("plain prose reply");
        assert_eq!(critique.surface_claim, "plain prose reply");
        assert_eq!(critique.revised_quote, "");
        assert!(critique.philosophical_grounding.is_empty());
        assert!(critique.anchor_quote.is_empty());
    }
}
