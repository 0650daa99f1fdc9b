//! Quote records - the unit of the canonical corpus

use thiserror::Error;

/// Errors raised when a raw record violates the quote invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A required field was absent from the input
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A required text field was empty after trimming
    #[error("Field '{0}' cannot be empty")]
    EmptyField(&'static str),

    /// The theme list was empty
    #[error("At least one theme is required")]
    NoThemes,
}

/// Unvalidated quote data as handed over by corpus ingestion
///
/// Every field is optional here; [`QuoteRecord::new`] decides what is
/// acceptable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuote {
    /// Identifier (defaults to empty when absent)
    pub id: Option<String>,
    /// Quote body
    pub text: Option<String>,
    /// Author name
    pub author: Option<String>,
    /// Philosophical tradition
    pub tradition: Option<String>,
    /// Theme tags
    pub themes: Option<Vec<String>>,
    /// Verification flag (defaults to true)
    pub verified: Option<bool>,
    /// Note on how the attribution is known
    pub attribution_note: Option<String>,
    /// Work the quote comes from
    pub source_work: Option<String>,
    /// Year of the source work
    pub year: Option<String>,
}

/// A validated canonical quote
///
/// Records are immutable once constructed. The only way to build one is
/// [`QuoteRecord::new`], which enforces:
/// - `text` and `author` are non-empty after trimming
/// - `themes` contains at least one entry
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    id: String,
    text: String,
    author: String,
    tradition: String,
    themes: Vec<String>,
    verified: bool,
    attribution_note: Option<String>,
    source_work: Option<String>,
    year: Option<String>,
}

impl QuoteRecord {
    /// Validate a raw record and build a `QuoteRecord`
    ///
    /// # Examples
    ///
    /// ```
    /// use aphorist_domain::{QuoteRecord, RawQuote};
    ///
    /// let raw = RawQuote {
    ///     id: Some("stoic-001".into()),
    ///     text: Some("We suffer more in imagination than in reality.".into()),
    ///     author: Some("Seneca".into()),
    ///     tradition: Some("Stoicism".into()),
    ///     themes: Some(vec!["suffering".into(), "fear".into()]),
    ///     ..Default::default()
    /// };
    /// let quote = QuoteRecord::new(raw).unwrap();
    /// assert!(quote.verified());
    /// ```
    pub fn new(raw: RawQuote) -> Result<Self, RecordValidationError> {
        let text = raw.text.ok_or(RecordValidationError::MissingField("text"))?;
        let author = raw.author.ok_or(RecordValidationError::MissingField("author"))?;
        let tradition = raw
            .tradition
            .ok_or(RecordValidationError::MissingField("tradition"))?;
        let themes = raw.themes.ok_or(RecordValidationError::MissingField("themes"))?;

        if text.trim().is_empty() {
            return Err(RecordValidationError::EmptyField("text"));
        }
        if author.trim().is_empty() {
            return Err(RecordValidationError::EmptyField("author"));
        }
        if themes.is_empty() {
            return Err(RecordValidationError::NoThemes);
        }

        Ok(Self {
            id: raw.id.unwrap_or_default(),
            text,
            author,
            tradition,
            themes,
            verified: raw.verified.unwrap_or(true),
            attribution_note: raw.attribution_note,
            source_work: raw.source_work,
            year: raw.year,
        })
    }

    /// Identifier (may be empty or duplicated across a corpus)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Quote body
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Author name
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Philosophical tradition
    pub fn tradition(&self) -> &str {
        &self.tradition
    }

    /// Theme tags
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Whether the attribution is verified
    pub fn verified(&self) -> bool {
        self.verified
    }

    /// Attribution note, if any
    pub fn attribution_note(&self) -> Option<&str> {
        self.attribution_note.as_deref()
    }

    /// Source work, if any
    pub fn source_work(&self) -> Option<&str> {
        self.source_work.as_deref()
    }

    /// Year of the source work, if any
    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    /// Case-insensitive check for a theme tag
    pub fn has_theme(&self, theme: &str) -> bool {
        let theme = theme.to_lowercase();
        self.themes.iter().any(|t| t.to_lowercase() == theme)
    }

    /// Formatted attribution line with verification status
    ///
    /// ```
    /// use aphorist_domain::{QuoteRecord, RawQuote};
    ///
    /// let quote = QuoteRecord::new(RawQuote {
    ///     text: Some("The unexamined life is not worth living.".into()),
    ///     author: Some("Socrates".into()),
    ///     tradition: Some("Classical Greek".into()),
    ///     themes: Some(vec!["self-knowledge".into()]),
    ///     source_work: Some("Apology".into()),
    ///     year: Some("399 BC".into()),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// assert_eq!(quote.attribution(), "— Socrates (Apology, 399 BC)");
    /// ```
    pub fn attribution(&self) -> String {
        let mut line = format!("— {}", self.author);

        if !self.verified {
            line.push_str(" [UNVERIFIED]");
        } else if let Some(note) = &self.attribution_note {
            line.push_str(&format!(" [{}]", note));
        }

        if let Some(work) = &self.source_work {
            match &self.year {
                Some(year) => line.push_str(&format!(" ({}, {})", work, year)),
                None => line.push_str(&format!(" ({})", work)),
            }
        }

        line
    }

    /// Convert back into the raw ingestion shape (used for export)
    pub fn to_raw(&self) -> RawQuote {
        RawQuote {
            id: Some(self.id.clone()),
            text: Some(self.text.clone()),
            author: Some(self.author.clone()),
            tradition: Some(self.tradition.clone()),
            themes: Some(self.themes.clone()),
            verified: Some(self.verified),
            attribution_note: self.attribution_note.clone(),
            source_work: self.source_work.clone(),
            year: self.year.clone(),
        }
    }
}
