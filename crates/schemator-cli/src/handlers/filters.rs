//! Filters command handler

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;

/// One row of the filter listing
#[derive(Debug, Serialize, PartialEq)]
struct FilterInfo {
    name: String,
    arguments: &'static str,
    description: &'static str,
}

/// Handle the filters command
pub fn handle_filters(config: &Config, output: &mut OutputWriter) -> Result<()> {
    let listing = filter_listing(config)?;

    if output.format() != OutputFormat::Human {
        return output.data(&listing);
    }

    if listing.is_empty() {
        output.warning("No filters registered (engine.built_in_filters is off)")?;
        return Ok(());
    }

    output.section("Filters")?;
    let rows = listing
        .into_iter()
        .map(|info| vec![info.name, info.arguments.to_string(), info.description.to_string()])
        .collect();
    output.table(&["NAME", "ARGUMENTS", "DESCRIPTION"], rows)
}

/// Filters registered by an engine built from the configuration
fn filter_listing(config: &Config) -> Result<Vec<FilterInfo>> {
    let schemator = config.engine.builder()?.build()?;

    Ok(schemator
        .filters()
        .names()
        .into_iter()
        .map(|name| {
            let (arguments, description) = describe(name);
            FilterInfo {
                name: name.to_string(),
                arguments,
                description,
            }
        })
        .collect())
}

fn describe(name: &str) -> (&'static str, &'static str) {
    match name {
        "const" => ("value", "replace the input with the argument"),
        "default" => ("value", "use the argument when the input is null"),
        "upper" => ("", "uppercase a string"),
        "lower" => ("", "lowercase a string"),
        "trim" => ("", "strip surrounding whitespace"),
        "sum" => ("", "add up an array of numbers"),
        "average" => ("", "mean of a non-empty array of numbers"),
        "count" => ("", "length of an array, object or string"),
        "implode" => ("[separator]", "join scalars into a string"),
        "explode" => ("[separator]", "split a string into an array"),
        "flatten" => ("", "flatten nested arrays into one"),
        "sort" => ("", "sort numbers or strings ascending"),
        "rsort" => ("", "sort numbers or strings descending"),
        "unique" => ("", "drop repeated items, keeping the first"),
        "replace" => ("pattern, replacement", "regex replace in a string"),
        "date" => ("[format]", "format a unix timestamp"),
        "path" => ("path", "value at a path inside the input"),
        _ => ("", ""),
    }
}
