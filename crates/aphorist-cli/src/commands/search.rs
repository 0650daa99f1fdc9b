//! Search command implementation.

use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use aphorist_store::QuoteStore;

/// Execute the search command.
pub fn execute_search(args: SearchArgs, store: &QuoteStore, formatter: &Formatter) -> Result<()> {
    let keyword = args.keyword.trim();
    if keyword.is_empty() {
        return Err(CliError::InvalidInput("Keyword must not be empty".to_string()));
    }

    let results = store.search(keyword, args.field.into());
    println!("{}", formatter.format_quotes(&results)?);
    Ok(())
}
