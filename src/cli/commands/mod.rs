//! Subcommand implementations.

pub mod add;
pub mod get;
pub mod init;
pub mod list;
pub mod noop;
pub mod type_;

use crate::backup::BackupFlag;
use crate::config::{self, CliOverrides, ResolvedConfig};
use crate::error::Result;
use crate::notify::ChangeNotifier;
use crate::storage::DayFlagStore;
use serde::Serialize;
use std::sync::Arc;

/// Resolve config and open the store for a one-shot command.
pub(crate) fn open_store(cli: &CliOverrides) -> Result<(DayFlagStore, ResolvedConfig)> {
    let resolved = config::load_config(cli)?;
    let store = resolved.open_store(
        Arc::new(ChangeNotifier::new()),
        Arc::new(BackupFlag::new()),
    )?;
    Ok((store, resolved))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}
