//! Connection bootstrap for the in-memory store database.
//!
//! # Responsibility
//! - Open the in-memory SQLite connection and configure required pragmas.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Opens a fresh in-memory store database with all migrations applied.
///
/// Every call returns an independent database; two stores never share
/// state. Emits `db_open` logging events with duration and status.
pub fn open_store_db() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .map_err(Into::into)
        .and_then(|mut conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode=memory duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode=memory duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }

    result
}
