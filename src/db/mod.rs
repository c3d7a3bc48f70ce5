// src/db/mod.rs

//! Catalogue database access
//!
//! Thin helpers around `rusqlite` for opening the catalogue, creating its
//! schema and running closures inside a transaction. Row-level access lives
//! in `models`.

pub mod migrations;
pub mod models;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::{debug, info};

fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_secs(30))?;
    Ok(())
}

/// Create (or bring up to date) a catalogue database at `path`
pub fn init(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    info!("Initializing catalogue database at {}", path.display());

    let conn = Connection::open(path)?;
    configure(&conn)?;
    schema::migrate(&conn)?;
    Ok(())
}

/// Open an existing catalogue database
///
/// Refuses a missing file or a database whose schema is not current, so a
/// wrong path never silently creates an empty catalogue.
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::InitError(format!(
            "database not found: {}",
            path.display()
        )));
    }

    debug!("Opening catalogue database {}", path.display());
    let conn = Connection::open(path)?;
    configure(&conn)?;
    schema::ensure_current(&conn)?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing only if it returns `Ok`
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
