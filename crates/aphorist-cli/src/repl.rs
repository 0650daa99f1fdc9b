//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use aphorist_critic::{Critic, Language, ToneMode};
use aphorist_domain::ChatProvider;
use aphorist_store::SearchField;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Run the interactive REPL.
///
/// `corpus_path` is re-read by the `reload` command.
pub async fn run_repl<L>(
    config: &Config,
    corpus_path: Option<&Path>,
    critic: &Critic<L>,
    formatter: &Formatter,
) -> Result<()>
where
    L: ChatProvider + Send + Sync + 'static,
    L::Error: Display,
{
    println!(
        "{}",
        formatter.info("Aphorist REPL - Type a quote to critique it, 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = format!("aphorist [{}|{}]> ", critic.mode(), critic.language());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) =
                            execute_repl_command(cmd, config, corpus_path, critic, formatter).await
                        {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Analyze(String),
    Similar(String),
    Search { field: SearchField, keyword: String },
    Mode(Option<String>),
    Language(Option<String>),
    Languages,
    Stats,
    History,
    Clear,
    Reload,
}

/// Parse a REPL command line.
///
/// Anything that is not a command is a quote to analyze, so
/// "Help others and you help yourself." is critiqued, not treated as `help`.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    if word.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    let arg = (!rest.is_empty()).then(|| rest.to_string());
    // Settings take a single word; longer lines starting with one are quotes
    let setting = !rest.contains(char::is_whitespace);

    let command = match word.to_lowercase().as_str() {
        "analyze" => arg
            .map(ReplCommand::Analyze)
            .ok_or_else(|| usage("analyze <quote>"))?,
        "similar" => arg
            .map(ReplCommand::Similar)
            .ok_or_else(|| usage("similar <text>"))?,
        "search" => parse_search_command(rest)?,
        "mode" if setting => ReplCommand::Mode(arg),
        "lang" | "language" if setting => ReplCommand::Language(arg),
        _ if arg.is_some() => ReplCommand::Analyze(line.to_string()),
        "exit" | "quit" | "q" => ReplCommand::Exit,
        "help" | "?" => ReplCommand::Help,
        "languages" => ReplCommand::Languages,
        "stats" => ReplCommand::Stats,
        "history" => ReplCommand::History,
        "clear" => ReplCommand::Clear,
        "reload" => ReplCommand::Reload,
        _ => ReplCommand::Analyze(line.to_string()),
    };
    Ok(command)
}

/// `search <keyword>` or `search <field>:<keyword>`.
fn parse_search_command(rest: &str) -> Result<ReplCommand> {
    if rest.is_empty() {
        return Err(usage("search [text|author|tradition|themes:]<keyword>"));
    }

    if let Some((prefix, keyword)) = rest.split_once(':') {
        if let Ok(field) = prefix.parse::<SearchField>() {
            let keyword = keyword.trim();
            if keyword.is_empty() {
                return Err(usage("search [text|author|tradition|themes:]<keyword>"));
            }
            return Ok(ReplCommand::Search {
                field,
                keyword: keyword.to_string(),
            });
        }
    }

    Ok(ReplCommand::Search {
        field: SearchField::default(),
        keyword: rest.to_string(),
    })
}

/// Execute a REPL command.
async fn execute_repl_command<L>(
    cmd: ReplCommand,
    config: &Config,
    corpus_path: Option<&Path>,
    critic: &Critic<L>,
    formatter: &Formatter,
) -> Result<()>
where
    L: ChatProvider + Send + Sync + 'static,
    L::Error: Display,
{
    match cmd {
        ReplCommand::Analyze(quote) => {
            let analysis = critic.analyze(&quote).await?;
            println!("{}", formatter.format_analysis(&analysis)?);
            debug!("{} calls left in window", critic.remaining_calls());
        }
        ReplCommand::Similar(text) => {
            let matches = critic.similar(&text, critic.config().query_options());
            println!("{}", formatter.format_matches(&matches)?);
        }
        ReplCommand::Search { field, keyword } => {
            let store = critic.corpus();
            println!("{}", formatter.format_quotes(&store.search(&keyword, field))?);
        }
        ReplCommand::Mode(None) => {
            println!("{}", formatter.info(&format!("Current mode: {}", critic.mode())));
            for mode in ToneMode::ALL {
                println!("  {:<11} {}", mode.name(), mode.description(critic.language()));
            }
        }
        ReplCommand::Mode(Some(name)) => {
            let mode = critic.set_mode(&name);
            println!("{}", formatter.success(&format!("Mode set to {}", mode)));
        }
        ReplCommand::Language(None) => {
            let language = critic.language();
            println!(
                "{}",
                formatter.info(&format!("Current language: {} ({})", language.name(), language))
            );
        }
        ReplCommand::Language(Some(code)) => {
            let language: Language = code.parse().map_err(CliError::InvalidInput)?;
            critic.set_language(language);
            println!(
                "{}",
                formatter.success(&format!("Language set to {}", language.native_name()))
            );
        }
        ReplCommand::Languages => {
            commands::execute_languages(formatter)?;
        }
        ReplCommand::Stats => {
            commands::execute_stats(&critic.corpus(), Some(critic.usage()), formatter)?;
        }
        ReplCommand::History => {
            println!("{}", formatter.format_history(&critic.history())?);
        }
        ReplCommand::Clear => {
            critic.clear_history();
            println!("{}", formatter.success("History cleared"));
        }
        ReplCommand::Reload => {
            let store = commands::load_store(config, corpus_path)?;
            let count = store.len();
            let skipped = commands::skipped_records(&store);
            critic.replace_corpus(store);
            println!("{}", formatter.success(&format!("Reloaded {} quotes", count)));
            if skipped > 0 {
                println!(
                    "{}",
                    formatter.warning(&format!("Skipped {} invalid records", skipped))
                );
            }
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn usage(text: &str) -> CliError {
    CliError::InvalidInput(format!("Usage: {}", text))
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to initialize editor: {}", e),
    ))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <quote>                        - Critique a quote");
    println!("  analyze <quote>                - Same, even if the quote starts with a command word");
    println!("  similar <text>                 - Rank corpus quotes by shared themes");
    println!("  search [field:]<keyword>       - Keyword search (text|author|tradition|themes)");
    println!("  mode [clarity|brutal|compassion] - Show or set the tone");
    println!("  lang [code]                    - Show or set the response language");
    println!("  languages                      - List supported languages");
    println!("  stats                          - Corpus statistics and session usage");
    println!("  history                        - Analyses from this session");
    println!("  clear                          - Forget this session's analyses");
    println!("  reload                         - Re-read the corpus file");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
