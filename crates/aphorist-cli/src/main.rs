//! Aphorist CLI - philosophical critique of quotes from the command line.

use aphorist_cli::commands;
use aphorist_cli::repl;
use aphorist_cli::{Cli, Command, Config, Formatter};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("APHORIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> aphorist_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        // No home directory: run on defaults
        None => match Config::path() {
            Ok(path) => Config::load_from(&path)?,
            Err(_) => Config::default(),
        },
    };
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    if let Some(Command::Languages) = cli.command {
        return commands::execute_languages(&formatter);
    }

    let corpus_path = cli.corpus.as_deref();
    let store = commands::load_store(&config, corpus_path)?;

    match cli.command {
        None | Some(Command::Repl) => {
            let critic = commands::build_critic(&config, Arc::new(store))?;
            repl::run_repl(&config, corpus_path, &critic, &formatter).await?;
        }
        Some(Command::Analyze(args)) => {
            let critic = commands::build_critic(&config, Arc::new(store))?;
            commands::execute_analyze(args, &critic, &formatter).await?;
        }
        Some(Command::Similar(args)) => {
            commands::execute_similar(args, &store, &config.critic, &formatter)?;
        }
        Some(Command::Browse(args)) => {
            commands::execute_browse(args, &store, &formatter)?;
        }
        Some(Command::Search(args)) => {
            commands::execute_search(args, &store, &formatter)?;
        }
        Some(Command::Catalog(args)) => {
            commands::execute_catalog(args, &store, &formatter)?;
        }
        Some(Command::Stats) => {
            commands::execute_stats(&store, None, &formatter)?;
        }
        Some(Command::Languages) => {
            commands::execute_languages(&formatter)?;
        }
    }

    Ok(())
}
