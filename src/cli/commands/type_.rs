//! Type command implementation.
//!
//! Resolution only needs the configured authority, so no database is opened.

use crate::cli::TypeArgs;
use crate::cli::commands::print_json;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::uri::{ResourceUri, Target};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct TypeOutput<'a> {
    uri: &'a ResourceUri,
    #[serde(rename = "type")]
    item_type: &'static str,
}

/// Execute the type command.
///
/// # Errors
///
/// Returns an error if the address is malformed or names no known namespace.
pub fn execute(args: &TypeArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let uri = ResourceUri::parse(args.uri.trim())?;
    let resolved = config::load_config(cli)?;
    let target = Target::resolve(&uri, &resolved.options.authority)?;
    let item_type = target.namespace().item_type();
    debug!(%uri, item_type, "Resolved address type");

    if json {
        return print_json(&TypeOutput {
            uri: &uri,
            item_type,
        });
    }

    println!("{item_type}");
    Ok(())
}
