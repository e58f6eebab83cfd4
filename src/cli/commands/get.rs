//! Get command implementation.

use crate::cli::GetArgs;
use crate::cli::commands::{open_store, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::{DATE_FORMAT, Namespace, parse_day};

/// Execute the get command.
///
/// # Errors
///
/// Returns an error if the date is malformed or the lookup fails.
pub fn execute(args: &GetArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let namespace = Namespace::from(args.namespace);
    let date = parse_day(&args.date)?.format(DATE_FORMAT).to_string();

    let (store, _resolved) = open_store(cli)?;
    let flag = store.lookup(namespace, &date)?;

    if json {
        return print_json(&flag);
    }

    match flag {
        Some(flag) => println!("{namespace} {} state={} (id {})", flag.date, flag.state, flag.id),
        None => println!("{namespace} {date}: not set"),
    }
    Ok(())
}
