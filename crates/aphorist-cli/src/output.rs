//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use aphorist_critic::{Analysis, Language, SimilarQuote, Usage};
use aphorist_domain::QuoteRecord;
use aphorist_store::CorpusStats;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format corpus records.
    pub fn format_quotes(&self, quotes: &[&QuoteRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = quotes.iter().map(|q| quote_json(q)).collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(quotes
                .iter()
                .map(|q| q.id().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if quotes.is_empty() {
                    return Ok(self.colorize("No quotes found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Quote", "Author", "Tradition", "Themes", "Verified"]);
                for quote in quotes {
                    builder.push_record([
                        quote.id().to_string(),
                        quote.text().to_string(),
                        quote.author().to_string(),
                        quote.tradition().to_string(),
                        quote.themes().join(", "),
                        yes_no(quote.verified()).to_string(),
                    ]);
                }
                Ok(self.render_table(builder))
            }
        }
    }

    /// Format ranked matches.
    pub fn format_matches(&self, matches: &[SimilarQuote]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(matches)?),
            OutputFormat::Quiet => Ok(matches
                .iter()
                .map(|m| m.id.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if matches.is_empty() {
                    return Ok(self.colorize("No matching quotes.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Score", "Quote", "Attribution", "Tradition"]);
                for m in matches {
                    builder.push_record([
                        m.score.to_string(),
                        m.text.clone(),
                        m.attribution.clone(),
                        m.tradition.clone(),
                    ]);
                }
                Ok(self.render_table(builder))
            }
        }
    }

    /// Format a completed critique.
    pub fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&analysis_json(analysis))?),
            OutputFormat::Quiet => {
                let critique = &analysis.critique;
                if critique.revised_quote.is_empty() {
                    Ok(critique.surface_claim.clone())
                } else {
                    Ok(critique.revised_quote.clone())
                }
            }
            OutputFormat::Table => Ok(self.analysis_report(analysis)),
        }
    }

    fn analysis_report(&self, analysis: &Analysis) -> String {
        let critique = &analysis.critique;
        let mut out = String::new();

        out.push_str(&self.heading(&format!("“{}”", analysis.input_quote)));
        out.push_str(&format!(
            "\nmode: {}  language: {}\n\n",
            analysis.mode, analysis.language
        ));

        if !analysis.parsed {
            out.push_str(&self.warning("Model reply was not structured; showing raw text"));
            out.push('\n');
        }

        out.push_str(&self.field("Surface claim", &critique.surface_claim));
        out.push_str(&self.field("Hidden assumption", &critique.hidden_assumption));
        out.push_str(&self.field(
            "Grounding",
            &critique.philosophical_grounding.join(", "),
        ));
        out.push_str(&self.field("Revised", &critique.revised_quote));

        let anchor = &critique.anchor_quote;
        if !anchor.is_empty() {
            let line = format!("“{}” — {} ({})", anchor.text, anchor.author, anchor.tradition);
            out.push_str(&self.field("Anchor", &line));
        }

        out.push('\n');
        out.push_str(&self.heading("Canonical matches"));
        out.push('\n');
        if analysis.similar.is_empty() {
            out.push_str("  (none)\n");
        } else {
            for m in &analysis.similar {
                out.push_str(&format!("  [{}] “{}” {}\n", m.score, m.text, m.attribution));
            }
        }

        out
    }

    /// Format corpus statistics, with session usage when available.
    pub fn format_stats(&self, stats: &CorpusStats, usage: Option<Usage>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "corpus": stats,
                    "usage": usage,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(stats.total_quotes.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                builder.push_record(["Quotes".to_string(), stats.total_quotes.to_string()]);
                builder.push_record(["Verified".to_string(), stats.verified_quotes.to_string()]);
                builder.push_record(["Unverified".to_string(), stats.unverified_quotes.to_string()]);
                builder.push_record(["Traditions".to_string(), stats.total_traditions.to_string()]);
                builder.push_record(["Themes".to_string(), stats.total_themes.to_string()]);
                builder.push_record(["Authors".to_string(), stats.total_authors.to_string()]);
                if let Some(usage) = usage {
                    builder.push_record(["API calls".to_string(), usage.api_calls.to_string()]);
                    builder.push_record(["Tokens used".to_string(), usage.total_tokens.to_string()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(format!(
                    "{}\n{}",
                    table,
                    self.info(&format!("Traditions: {}", stats.traditions.join(", ")))
                ))
            }
        }
    }

    /// Format a plain list of names.
    pub fn format_list(&self, title: &str, items: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Quiet => Ok(items.join("\n")),
            OutputFormat::Table => {
                let mut out = self.heading(&format!("{} ({})", title, items.len()));
                for item in items {
                    out.push_str(&format!("\n  {}", item));
                }
                Ok(out)
            }
        }
    }

    /// Format supported languages.
    pub fn format_languages(&self) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = Language::ALL
                    .iter()
                    .map(|l| {
                        serde_json::json!({
                            "code": l.code(),
                            "name": l.name(),
                            "native_name": l.native_name(),
                            "localized_prompt": l.has_template(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(Language::ALL
                .iter()
                .map(|l| l.code())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Code", "Language", "Native", "Localized prompt"]);
                for lang in Language::ALL {
                    builder.push_record([
                        lang.code().to_uppercase(),
                        lang.name().to_string(),
                        lang.native_name().to_string(),
                        yes_no(lang.has_template()).to_string(),
                    ]);
                }
                Ok(self.render_table(builder))
            }
        }
    }

    /// Format the session's analysis history.
    pub fn format_history(&self, history: &[Analysis]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = history.iter().map(analysis_json).collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(history
                .iter()
                .map(|a| a.input_quote.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if history.is_empty() {
                    return Ok(self.colorize("No analyses yet.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Quote", "Mode", "Lang", "Matches"]);
                for (i, analysis) in history.iter().enumerate() {
                    builder.push_record([
                        (i + 1).to_string(),
                        analysis.input_quote.clone(),
                        analysis.mode.to_string(),
                        analysis.language.to_string(),
                        analysis.similar.len().to_string(),
                    ]);
                }
                Ok(self.render_table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn heading(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn field(&self, label: &str, value: &str) -> String {
        let value = if value.is_empty() { "-" } else { value };
        format!("{} {}\n", self.colorize(&format!("{}:", label), "cyan"), value)
    }

    fn render_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn quote_json(quote: &QuoteRecord) -> serde_json::Value {
    serde_json::json!({
        "id": quote.id(),
        "text": quote.text(),
        "author": quote.author(),
        "tradition": quote.tradition(),
        "themes": quote.themes(),
        "verified": quote.verified(),
        "attribution": quote.attribution(),
        "attribution_note": quote.attribution_note(),
        "source_work": quote.source_work(),
        "year": quote.year(),
    })
}

fn analysis_json(analysis: &Analysis) -> serde_json::Value {
    serde_json::json!({
        "id": analysis.id.to_string(),
        "input_quote": analysis.input_quote,
        "critique": analysis.critique,
        "similar_canonical_quotes": analysis.similar,
        "mode": analysis.mode,
        "language": analysis.language,
        "created_at": analysis.created_at,
        "parsed": analysis.parsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aphorist_critic::{Critique, ToneMode};
    use aphorist_domain::{AnalysisId, RawQuote};

    fn quote() -> QuoteRecord {
        QuoteRecord::new(RawQuote {
            id: Some("stoic-002".into()),
            text: Some("Men are disturbed not by things, but by the opinions about things.".into()),
            author: Some("Epictetus".into()),
            tradition: Some("Stoicism".into()),
            themes: Some(vec!["perception".into(), "judgment".into()]),
            ..Default::default()
        })
        .unwrap()
    }

    fn analysis() -> Analysis {
        Analysis {
            id: AnalysisId::new(),
            input_quote: "Judgment is everything.".to_string(),
            critique: Critique {
                surface_claim: "Judgment shapes experience.".to_string(),
                revised_quote: "Judgment shapes much of experience.".to_string(),
                ..Default::default()
            },
            similar: vec![SimilarQuote {
                id: "stoic-002".to_string(),
                text: "Men are disturbed not by things.".to_string(),
                author: "Epictetus".to_string(),
                tradition: "Stoicism".to_string(),
                themes: vec!["judgment".to_string()],
                verified: true,
                attribution: "— Epictetus".to_string(),
                score: 1,
            }],
            mode: ToneMode::Clarity,
            language: Language::English,
            created_at: 1_700_000_000,
            parsed: true,
        }
    }

    #[test]
    fn test_quotes_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let record = quote();
        let output = formatter.format_quotes(&[&record]).unwrap();
        assert!(output.contains("Author"));
        assert!(output.contains("Epictetus"));
        assert!(output.contains("stoic-002"));
    }

    #[test]
    fn test_quotes_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let record = quote();
        let output = formatter.format_quotes(&[&record]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["author"], "Epictetus");
        assert_eq!(parsed[0]["verified"], true);
        assert_eq!(parsed[0]["themes"][1], "judgment");
    }

    #[test]
    fn test_quotes_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let record = quote();
        assert_eq!(formatter.format_quotes(&[&record]).unwrap(), "stoic-002");
    }

    #[test]
    fn test_empty_quotes() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_quotes(&[]).unwrap();
        assert!(output.contains("No quotes found"));
    }

    #[test]
    fn test_analysis_report() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_analysis(&analysis()).unwrap();
        assert!(output.contains("Surface claim: Judgment shapes experience."));
        assert!(output.contains("Hidden assumption: -"));
        assert!(output.contains("[1] “Men are disturbed not by things.” — Epictetus"));
        assert!(!output.contains("Anchor:"));
    }

    #[test]
    fn test_analysis_fallback_warning() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut fallback = analysis();
        fallback.parsed = false;
        let output = formatter.format_analysis(&fallback).unwrap();
        assert!(output.contains("⚠ Model reply was not structured"));
    }

    #[test]
    fn test_analysis_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_analysis(&analysis()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["mode"], "clarity");
        assert_eq!(parsed["language"], "en");
        assert_eq!(parsed["critique"]["surface_claim"], "Judgment shapes experience.");
        assert_eq!(parsed["similar_canonical_quotes"][0]["score"], 1);
    }

    #[test]
    fn test_analysis_quiet_prefers_revision() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_analysis(&analysis()).unwrap();
        assert_eq!(output, "Judgment shapes much of experience.");
    }

    #[test]
    fn test_stats_json_includes_usage() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let stats = CorpusStats {
            total_quotes: 2,
            verified_quotes: 1,
            unverified_quotes: 1,
            total_traditions: 1,
            total_themes: 3,
            total_authors: 2,
            traditions: vec!["Stoicism".to_string()],
        };
        let usage = Usage {
            api_calls: 4,
            total_tokens: 900,
        };
        let output = formatter.format_stats(&stats, Some(usage)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["corpus"]["total_quotes"], 2);
        assert_eq!(parsed["usage"]["total_tokens"], 900);
    }

    #[test]
    fn test_languages_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_languages().unwrap();
        assert_eq!(output.lines().count(), 8);
        assert!(output.starts_with("en\nes"));
    }

    #[test]
    fn test_list_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_list("Traditions", &["Stoicism".to_string(), "Taoism".to_string()])
            .unwrap();
        assert!(output.starts_with("Traditions (2)"));
        assert!(output.contains("\n  Taoism"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
