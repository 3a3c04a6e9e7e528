//! Ordered schema migrations for the slot database.
//!
//! # Invariants
//! - Versions are strictly increasing and never renumbered.
//! - All pending steps run inside one transaction.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::Connection;

const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_kv_slots.sql"))];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version recorded on the connection.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Upgrades the schema to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let pending: Vec<_> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        debug!("event=db_migrate module=db status=applied version={version}");
    }
    tx.commit()?;
    Ok(())
}
