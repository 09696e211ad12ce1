//! Schema migrations for the todo store.
//!
//! Each step is an embedded SQL file. The highest applied step is recorded in
//! `PRAGMA user_version`; pending steps are applied together in one
//! transaction so a partially migrated store is never observed.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    /// Tables created or altered by this step.
    tables: &'static [&'static str],
    sql: &'static str,
}

// Versions must stay strictly increasing.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "init_categories_items",
    tables: &["categories", "items"],
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version this build can open.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the store schema up to [`latest_version`].
///
/// Stores written by a newer build are refused with
/// [`DbError::UnsupportedSchemaVersion`] rather than downgraded.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    if from_version == latest {
        debug!("event=db_migrate module=db status=skip version={latest}");
        return Ok(());
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();

    let tx = conn.transaction()?;
    for migration in &pending {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migrate_step module=db version={} name={} tables={}",
            migration.version,
            migration.name,
            migration.tables.join(",")
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} steps={}",
        pending.len()
    );
    Ok(())
}

/// Schema version recorded in the store file.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}
