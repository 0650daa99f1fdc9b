//! Theme-based ranking of corpus quotes against free text
//!
//! Scoring is lexical: a record scores one point for every theme whose
//! lower-cased form occurs as a substring of the lower-cased input. The input
//! is not tokenized, so short themes can over-match inside longer words
//! ("art" matches "heart").
//!
//! Ties are broken by original corpus order: candidates are collected in
//! corpus order and sorted with a stable sort on score alone.

use aphorist_domain::{QuoteCorpus, QuoteRecord};

/// Number of matches returned when the caller does not choose
pub const DEFAULT_TOP_K: usize = 3;

/// Ranking options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum matches to return (0 returns nothing)
    pub top_k: usize,

    /// Whether unverified quotes are eligible
    pub include_unverified: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            include_unverified: false,
        }
    }
}

impl QueryOptions {
    /// Options with a specific `top_k`
    pub fn top(top_k: usize) -> Self {
        Self {
            top_k,
            ..Self::default()
        }
    }

    /// Allow unverified quotes in the candidate pool
    pub fn with_unverified(mut self, include_unverified: bool) -> Self {
        self.include_unverified = include_unverified;
        self
    }
}

/// A corpus record paired with its relevance score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredQuote<'a> {
    /// The matched record
    pub quote: &'a QuoteRecord,

    /// Number of the record's themes found in the input
    pub score: usize,
}

/// Count the record's themes that occur inside `lowered_text`
///
/// `lowered_text` must already be lower-cased.
pub fn theme_score(quote: &QuoteRecord, lowered_text: &str) -> usize {
    quote
        .themes()
        .iter()
        .filter(|theme| lowered_text.contains(theme.to_lowercase().as_str()))
        .count()
}

/// Rank corpus records against `text`
///
/// Returns at most `options.top_k` records with a non-zero score, highest
/// score first. Errors from the corpus are propagated unchanged.
pub fn find_similar<'c, C>(
    corpus: &'c C,
    text: &str,
    options: QueryOptions,
) -> Result<Vec<ScoredQuote<'c>>, C::Error>
where
    C: QuoteCorpus + ?Sized,
{
    if options.top_k == 0 {
        return Ok(Vec::new());
    }

    let lowered = text.to_lowercase();

    let mut scored: Vec<ScoredQuote<'c>> = corpus
        .records()?
        .iter()
        .filter(|quote| options.include_unverified || quote.verified())
        .filter_map(|quote| {
            let score = theme_score(quote, &lowered);
            (score > 0).then_some(ScoredQuote { quote, score })
        })
        .collect();

    // `sort_by` is stable: equal scores keep corpus order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(options.top_k);

    Ok(scored)
}
