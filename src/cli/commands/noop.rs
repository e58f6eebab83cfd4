//! Update and delete commands.
//!
//! The store never modifies or removes records, so both report zero rows.

use crate::cli::commands::{open_store, print_json};
use crate::cli::{DeleteArgs, UpdateArgs};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::{DayFlagValues, Namespace, parse_day};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AffectedOutput {
    namespace: Namespace,
    rows_affected: usize,
}

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the date is malformed or the store cannot be opened.
pub fn execute_update(args: &UpdateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let namespace = Namespace::from(args.namespace);
    let values = DayFlagValues::for_day(parse_day(&args.date)?, args.state);
    let (store, _resolved) = open_store(cli)?;
    let rows_affected = store.update(namespace, &values, None, &[]);
    report(namespace, rows_affected, json)
}

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
pub fn execute_delete(args: &DeleteArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let namespace = Namespace::from(args.namespace);
    let selection_args: Vec<&str> = args.args.iter().map(String::as_str).collect();
    let (store, _resolved) = open_store(cli)?;
    let rows_affected = store.delete(namespace, args.selection.as_deref(), &selection_args);
    report(namespace, rows_affected, json)
}

fn report(namespace: Namespace, rows_affected: usize, json: bool) -> Result<()> {
    if json {
        return print_json(&AffectedOutput {
            namespace,
            rows_affected,
        });
    }
    println!("{rows_affected} rows affected");
    Ok(())
}
