//! CLI command definitions and argument parsing.

use aphorist_store::SearchField;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aphorist - Philosophical critique of quotes, anchored in a canonical corpus.
#[derive(Debug, Parser)]
#[command(name = "aphorist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "APHORIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Quote corpus path (overrides the config file)
    #[arg(long, global = true, env = "APHORIST_CORPUS")]
    pub corpus: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids or bare text)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Critique a quote with the language model
    Analyze(AnalyzeArgs),

    /// Rank corpus quotes by shared themes
    Similar(SimilarArgs),

    /// List corpus quotes by tradition, theme, author or verification
    Browse(BrowseArgs),

    /// Keyword search in one field
    Search(SearchArgs),

    /// List distinct traditions, themes or authors
    Catalog(CatalogArgs),

    /// Corpus statistics
    Stats,

    /// Supported response languages
    Languages,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// The quote (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub quote: Vec<String>,

    /// Tone: clarity, brutal or compassion
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Response language code (en, es, fr, de, it, pt, ja, zh)
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Arguments for the similar command.
#[derive(Debug, Parser)]
pub struct SimilarArgs {
    /// Free text to match against corpus themes
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Maximum number of matches
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Also match unverified quotes
    #[arg(long)]
    pub include_unverified: bool,
}

/// Arguments for the browse command.
#[derive(Debug, Default, Parser)]
pub struct BrowseArgs {
    /// Exact tradition (case-insensitive)
    #[arg(short, long)]
    pub tradition: Option<String>,

    /// Exact theme (case-insensitive)
    #[arg(long)]
    pub theme: Option<String>,

    /// Author name fragment
    #[arg(short, long)]
    pub author: Option<String>,

    /// Only unverified quotes
    #[arg(long)]
    pub unverified: bool,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Keyword (case-insensitive substring)
    pub keyword: String,

    /// Field to search
    #[arg(long, value_enum, default_value = "text")]
    pub field: FieldArg,
}

/// Searchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FieldArg {
    /// Quote text
    Text,
    /// Author name
    Author,
    /// Tradition label
    Tradition,
    /// Any theme tag
    Themes,
}

/// Arguments for the catalog command.
#[derive(Debug, Parser)]
pub struct CatalogArgs {
    /// What to list
    #[arg(value_enum)]
    pub kind: CatalogKind,
}

/// Catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CatalogKind {
    /// Distinct traditions
    Traditions,
    /// Distinct themes
    Themes,
    /// Distinct authors
    Authors,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<FieldArg> for SearchField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Text => SearchField::Text,
            FieldArg::Author => SearchField::Author,
            FieldArg::Tradition => SearchField::Tradition,
            FieldArg::Themes => SearchField::Themes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_repl() {
        let cli = Cli::parse_from(["aphorist"]);
        assert!(cli.command.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "aphorist",
            "analyze",
            "Fortune",
            "favors",
            "the",
            "bold.",
            "--mode",
            "brutal",
            "-l",
            "fr",
        ]);
        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.quote.join(" "), "Fortune favors the bold.");
                assert_eq!(args.mode.as_deref(), Some("brutal"));
                assert_eq!(args.language.as_deref(), Some("fr"));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_quote() {
        assert!(Cli::try_parse_from(["aphorist", "analyze"]).is_err());
    }

    #[test]
    fn test_similar_command() {
        let cli = Cli::parse_from(["aphorist", "similar", "virtue and death", "-k", "5", "--include-unverified"]);
        match cli.command {
            Some(Command::Similar(args)) => {
                assert_eq!(args.top_k, Some(5));
                assert!(args.include_unverified);
            }
            _ => panic!("Expected Similar command"),
        }
    }

    #[test]
    fn test_search_field() {
        let cli = Cli::parse_from(["aphorist", "search", "seneca", "--field", "author"]);
        match cli.command {
            Some(Command::Search(args)) => {
                assert_eq!(args.field, FieldArg::Author);
                assert_eq!(SearchField::from(args.field), SearchField::Author);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_catalog_and_global_flags() {
        let cli = Cli::parse_from(["aphorist", "catalog", "themes", "--format", "json", "--no-color"]);
        assert!(cli.no_color);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(
            cli.command,
            Some(Command::Catalog(CatalogArgs {
                kind: CatalogKind::Themes
            }))
        ));
    }
}
