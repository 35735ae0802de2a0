//! Named schema steps for the key-value database.
//!
//! Step numbers only grow; the last applied one is `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;
use std::cmp::Ordering;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "create_kv_entries",
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this binary reads and writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version recorded on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Fails unless `conn` is exactly at [`latest_version`].
///
/// # Errors
/// - `SchemaNotMigrated` for older schemas, including fresh databases.
/// - `UnsupportedSchemaVersion` for schemas written by a newer binary.
pub fn ensure_current(conn: &Connection) -> DbResult<()> {
    let db_version = schema_version(conn)?;
    let latest = latest_version();
    match db_version.cmp(&latest) {
        Ordering::Equal => Ok(()),
        Ordering::Less => Err(DbError::SchemaNotMigrated {
            db_version,
            expected: latest,
        }),
        Ordering::Greater => Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: latest,
        }),
    }
}

/// Runs every step newer than the recorded version inside one transaction.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > from).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    for step in pending {
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    Ok(())
}
