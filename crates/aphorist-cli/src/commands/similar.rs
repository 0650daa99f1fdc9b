//! Similar command implementation.

use crate::cli::SimilarArgs;
use crate::error::Result;
use crate::output::Formatter;
use aphorist_critic::{CriticConfig, SimilarQuote};
use aphorist_store::{QueryOptions, QuoteStore};

/// Execute the similar command.
pub fn execute_similar(
    args: SimilarArgs,
    store: &QuoteStore,
    defaults: &CriticConfig,
    formatter: &Formatter,
) -> Result<()> {
    let options = query_options(&args, defaults);
    let text = args.text.join(" ");

    let matches: Vec<SimilarQuote> = store
        .find_similar(&text, options)
        .into_iter()
        .map(SimilarQuote::from)
        .collect();

    println!("{}", formatter.format_matches(&matches)?);
    Ok(())
}

/// Flags win over configured defaults.
fn query_options(args: &SimilarArgs, defaults: &CriticConfig) -> QueryOptions {
    let mut options = defaults.query_options();
    if let Some(top_k) = args.top_k {
        options = QueryOptions::top(top_k).with_unverified(options.include_unverified);
    }
    if args.include_unverified {
        options = options.with_unverified(true);
    }
    options
}
