// src/commands/cleanup.rs

//! Cleanup command - empty the obsolete activity_detail table

use activity_backfill::cleanup::CLEANUP_NOTICE;
use activity_backfill::{CleanupOutcome, parse_confirmation, wipe_activity_detail};
use anyhow::Result;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use tracing::warn;

fn prompt(rows: u64) -> io::Result<bool> {
    let mut stdout = io::stdout();
    writeln!(stdout)?;
    writeln!(stdout, "{CLEANUP_NOTICE}")?;
    write!(stdout, "Delete {rows} activity_detail rows? (y/n): ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(parse_confirmation(&input))
}

/// Offer to delete the activity_detail rows
///
/// Declining is a normal outcome, not an error.
pub fn cmd_cleanup(conn: &mut Connection, assume_yes: bool) -> Result<()> {
    let outcome = wipe_activity_detail(conn, |rows| {
        if assume_yes {
            println!("\nDeleting {rows} activity_detail rows (--yes)");
            return true;
        }
        prompt(rows).unwrap_or_else(|e| {
            warn!("Could not read confirmation: {}", e);
            false
        })
    })?;

    match outcome {
        CleanupOutcome::AlreadyEmpty => println!("\nactivity_detail table is already emptied"),
        CleanupOutcome::Declined { rows } => {
            println!("Leaving {rows} activity_detail rows in place")
        }
        CleanupOutcome::Deleted { rows } => println!("activity_detail deleted ({rows} rows)"),
    }
    Ok(())
}
