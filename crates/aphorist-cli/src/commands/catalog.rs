//! Catalog command implementation.

use crate::cli::{CatalogArgs, CatalogKind};
use crate::error::Result;
use crate::output::Formatter;
use aphorist_store::QuoteStore;

/// Execute the catalog command.
pub fn execute_catalog(args: CatalogArgs, store: &QuoteStore, formatter: &Formatter) -> Result<()> {
    let (title, items) = match args.kind {
        CatalogKind::Traditions => ("Traditions", store.distinct_traditions()),
        CatalogKind::Themes => ("Themes", store.distinct_themes()),
        CatalogKind::Authors => ("Authors", store.distinct_authors()),
    };

    println!("{}", formatter.format_list(title, &items)?);
    Ok(())
}
