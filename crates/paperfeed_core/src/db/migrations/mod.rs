//! Schema migrations for the key-value database.
//!
//! The schema is a single table:
//!
//! ```text
//! kv_entries(
//!     key        TEXT PRIMARY KEY,  -- storage key, e.g. `bookmarked_papers`
//!     value      TEXT NOT NULL,     -- opaque UTF-8 value (JSON for lists)
//!     updated_at INTEGER NOT NULL   -- unix millis of the last write
//! )
//! ```
//!
//! # Invariants
//! - Migration versions are strictly increasing; the applied version is
//!   stored in `PRAGMA user_version`.
//! - All pending migrations run in one transaction, so a failed upgrade
//!   leaves the previous schema in place.
//! - A file whose version is newer than this build is rejected, never
//!   downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// Name of the table backing `SqliteKeyValueStore`.
pub const KV_TABLE: &str = "kv_entries";

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_kv_entries",
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version this build can write.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Whether `conn` is already at the latest schema version.
pub fn schema_is_current(conn: &Connection) -> DbResult<bool> {
    Ok(current_user_version(conn)? == latest_version())
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is newer than this build.
/// - `Sqlite` when a migration statement fails; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    let mut applied = 0usize;
    for migration in pending_migrations(from) {
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        debug!(
            "event=db_migration module=db status=applied version={} name={}",
            migration.version, migration.name
        );
        applied += 1;
    }
    tx.commit()?;

    if applied > 0 {
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
            from, latest, applied
        );
    }
    Ok(())
}

fn pending_migrations(from: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > from)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
