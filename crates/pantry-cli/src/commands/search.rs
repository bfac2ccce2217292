//! Search command implementation.

use crate::cli::SearchArgs;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use pantry_domain::traits::{Bound, NutrientBound, ProductStore, SearchRequest};

/// Execute the search command.
pub fn execute_search(args: SearchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let request = build_request(args);
    if request.is_empty() {
        eprintln!("{}", formatter.warning("No search criteria given"));
        return Ok(());
    }

    let store = open_store(config)?;
    let result = store.search(&request)?;
    tracing::debug!(rows = result.rows.len(), "Search complete");

    println!("{}", formatter.format_search(&result)?);

    Ok(())
}

/// Translate command-line filters into a search request.
pub fn build_request(args: SearchArgs) -> SearchRequest {
    let upper = args.max.into_iter().map(|(key, value)| NutrientBound {
        key,
        bound: Bound::AtMost(value),
    });
    let lower = args.min.into_iter().map(|(key, value)| NutrientBound {
        key,
        bound: Bound::AtLeast(value),
    });

    SearchRequest {
        name_contains: args.name,
        nutrient_bounds: upper.chain(lower).collect(),
        labels: args.label,
        stores: args.store,
        ingredients_contain: args.contains,
        ingredients_exclude: args.exclude,
        zipcode_prefix: args.zipcode,
    }
}
