//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use aphorist_critic::{Analysis, Critic, Language};
use aphorist_domain::ChatProvider;
use std::fmt::Display;

/// Execute the analyze command.
pub async fn execute_analyze<L>(
    args: AnalyzeArgs,
    critic: &Critic<L>,
    formatter: &Formatter,
) -> Result<()>
where
    L: ChatProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let analysis = run_analysis(args, critic).await?;
    println!("{}", formatter.format_analysis(&analysis)?);
    Ok(())
}

/// Apply per-call options, then critique the quote.
pub(crate) async fn run_analysis<L>(args: AnalyzeArgs, critic: &Critic<L>) -> Result<Analysis>
where
    L: ChatProvider + Send + Sync + 'static,
    L::Error: Display,
{
    if let Some(code) = args.language.as_deref() {
        let language: Language = code.parse().map_err(CliError::InvalidInput)?;
        critic.set_language(language);
    }
    if let Some(mode) = args.mode.as_deref() {
        critic.set_mode(mode);
    }

    let quote = args.quote.join(" ");
    Ok(critic.analyze(&quote).await?)
}
