//! Init command implementation.

use crate::cli::commands::{open_store, print_json};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Namespace;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Serialize)]
struct InitOutput {
    database: PathBuf,
    authority: String,
    schema_version: i32,
    holiday: usize,
    workday: usize,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the database cannot be created or opened.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    let (store, resolved) = open_store(cli)?;
    info!(path = %resolved.db_path.display(), "Store ready");

    let output = InitOutput {
        database: resolved.db_path.clone(),
        authority: store.authority().to_string(),
        schema_version: CURRENT_SCHEMA_VERSION,
        holiday: store.count(Namespace::Holiday)?,
        workday: store.count(Namespace::Workday)?,
    };

    if json {
        return print_json(&output);
    }

    println!("Initialized {}", output.database.display());
    println!(
        "  holiday: {} rows, workday: {} rows",
        output.holiday, output.workday
    );
    Ok(())
}
