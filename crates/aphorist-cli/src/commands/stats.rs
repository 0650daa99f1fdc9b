//! Stats command implementation.

use crate::error::Result;
use crate::output::Formatter;
use aphorist_critic::Usage;
use aphorist_store::QuoteStore;

/// Execute the stats command.
///
/// `usage` is only known inside a REPL session.
pub fn execute_stats(store: &QuoteStore, usage: Option<Usage>, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_stats(&store.stats(), usage)?);
    Ok(())
}
