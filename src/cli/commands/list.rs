//! List command implementation.

use crate::cli::ListArgs;
use crate::cli::commands::{open_store, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Namespace;
use tracing::{debug, info};

/// Execute the list command.
///
/// Unlike the store's best-effort `query`, a bad filter here is reported to
/// the user.
///
/// # Errors
///
/// Returns an error if the projection names an unknown column or the query fails.
pub fn execute(args: &ListArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let namespace = Namespace::from(args.namespace);
    let projection: Vec<&str> = args.columns.iter().map(|c| c.trim()).collect();
    let selection_args: Vec<&str> = args.args.iter().map(String::as_str).collect();

    let (store, _resolved) = open_store(cli)?;

    info!(%namespace, "Listing flags");
    debug!(selection = ?args.selection, args = ?selection_args, order = ?args.order, "Applied filters");

    let cursor = store.try_query(
        namespace,
        (!projection.is_empty()).then_some(projection.as_slice()),
        args.selection.as_deref(),
        &selection_args,
        args.order.as_deref(),
    )?;

    if json {
        return print_json(&cursor.rows());
    }

    if cursor.is_empty() {
        println!("No {namespace} flags.");
        return Ok(());
    }

    println!("{}", cursor.columns().join("\t"));
    for row in &cursor {
        let line: Vec<String> = row.values().iter().map(ToString::to_string).collect();
        println!("{}", line.join("\t"));
    }
    Ok(())
}
