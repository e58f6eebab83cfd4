//! Add command implementation.

use crate::cli::AddArgs;
use crate::cli::commands::{open_store, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::{DayFlagValues, Namespace, parse_day};
use crate::uri::ResourceUri;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct AddOutput {
    namespace: Namespace,
    date: String,
    inserted: bool,
    uri: Option<ResourceUri>,
}

/// Execute the add command.
///
/// An ignored duplicate is not an error: the command reports it and exits 0.
///
/// # Errors
///
/// Returns an error if the date is malformed or the store cannot be opened.
pub fn execute(args: &AddArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let namespace = Namespace::from(args.namespace);
    let day = parse_day(&args.date)?;
    let values = DayFlagValues::for_day(day, args.state);

    let (store, _resolved) = open_store(cli)?;
    let uri = store.insert(namespace, &values);
    debug!(%namespace, date = %values.date, inserted = uri.is_some(), "Add finished");

    let output = AddOutput {
        namespace,
        date: values.date,
        inserted: uri.is_some(),
        uri,
    };

    if json {
        return print_json(&output);
    }

    match &output.uri {
        Some(uri) => println!("{uri}"),
        None => println!(
            "{} {} already present; nothing inserted",
            output.namespace, output.date
        ),
    }
    Ok(())
}
