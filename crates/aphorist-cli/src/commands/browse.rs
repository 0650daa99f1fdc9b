//! Browse command implementation.

use crate::cli::BrowseArgs;
use crate::error::Result;
use crate::output::Formatter;
use aphorist_domain::QuoteRecord;
use aphorist_store::QuoteStore;
use std::ptr;

/// Execute the browse command.
pub fn execute_browse(args: BrowseArgs, store: &QuoteStore, formatter: &Formatter) -> Result<()> {
    let records = browse_records(store, &args);
    println!("{}", formatter.format_quotes(&records)?);
    Ok(())
}

/// Records matching every given filter, in corpus order.
///
/// With no filters the whole corpus is listed.
pub fn browse_records<'a>(store: &'a QuoteStore, args: &BrowseArgs) -> Vec<&'a QuoteRecord> {
    let mut selections: Vec<Vec<&QuoteRecord>> = Vec::new();
    if let Some(tradition) = &args.tradition {
        selections.push(store.by_tradition(tradition));
    }
    if let Some(theme) = &args.theme {
        selections.push(store.by_theme(theme));
    }
    if let Some(author) = &args.author {
        selections.push(store.by_author(author));
    }
    if args.unverified {
        selections.push(store.by_verification(false));
    }

    let mut records = match selections.pop() {
        Some(last) => last,
        None => store.all().iter().collect(),
    };
    for selection in &selections {
        records.retain(|q| selection.iter().any(|s| ptr::eq(*s, *q)));
    }

    if let Some(limit) = args.limit {
        records.truncate(limit);
    }
    records
}
