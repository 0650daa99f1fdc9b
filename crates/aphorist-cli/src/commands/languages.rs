//! Languages command implementation.

use crate::error::Result;
use crate::output::Formatter;

/// Execute the languages command.
pub fn execute_languages(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_languages()?);
    Ok(())
}
