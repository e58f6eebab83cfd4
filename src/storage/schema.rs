//! Database schema definitions and version handling.

use rusqlite::{Connection, Result};
use tracing::{debug, info};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the flag database.
pub const SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS holiday (
        id INTEGER PRIMARY KEY,
        date TEXT UNIQUE,
        state INTEGER
    );

    CREATE TABLE IF NOT EXISTS workday (
        id INTEGER PRIMARY KEY,
        date TEXT UNIQUE,
        state INTEGER
    );
";

/// Per-connection pragmas. Safe to run on every open.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<()> {
    conn.busy_timeout(std::time::Duration::from_millis(busy_timeout_ms))?;
    // WAL lets reader connections proceed while the writer holds its lock.
    // In-memory databases report "memory" here and that is fine.
    let _mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

/// Create tables on a fresh database or run the upgrade hook on an old one.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    let version = user_version(conn)?;

    if version == 0 {
        info!(version = CURRENT_SCHEMA_VERSION, "Creating flag schema");
        conn.execute_batch(SCHEMA_SQL)?;
    } else if version < CURRENT_SCHEMA_VERSION {
        run_migrations(conn, version, CURRENT_SCHEMA_VERSION)?;
        // Tables may still be missing if the file was created by something else.
        conn.execute_batch(SCHEMA_SQL)?;
    } else {
        debug!(version, "Schema already applied");
        return Ok(());
    }

    conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    Ok(())
}

/// Upgrade hook. No schema change exists between released versions.
#[allow(clippy::unnecessary_wraps)]
fn run_migrations(_conn: &Connection, from: i32, to: i32) -> Result<()> {
    debug!(from, to, "No migrations to run");
    Ok(())
}

pub fn user_version(conn: &Connection) -> Result<i32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}
