// src/cleanup.rs

//! One-time removal of the obsolete activity detail store
//!
//! Once every dataset's history lives in activity snapshots, the rows of
//! `activity_detail` are no longer read. Deleting them cannot be undone, so
//! the decision is delegated to a confirmation callback supplied by the
//! caller; this module never touches stdin.

use crate::db::{self, models::ActivityDetail};
use crate::error::Result;
use rusqlite::Connection;
use tracing::info;

/// Shown to the operator before asking for confirmation
pub const CLEANUP_NOTICE: &str = "\
Now the migration is done, the history of datasets is stored in the
activity table. The contents of the activity_detail table are no longer
used, and you can delete them to save space. This cannot be undone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Nothing to delete
    AlreadyEmpty,
    /// The operator said no; nothing was deleted
    Declined { rows: u64 },
    /// All rows deleted and committed
    Deleted { rows: usize },
}

/// Interpret an answer to the confirmation prompt
///
/// Only the first character counts, case-insensitively.
pub fn parse_confirmation(answer: &str) -> bool {
    answer
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}

/// Empty `activity_detail` if `confirm(row_count)` agrees
pub fn wipe_activity_detail<F>(conn: &mut Connection, confirm: F) -> Result<CleanupOutcome>
where
    F: FnOnce(u64) -> bool,
{
    let rows = ActivityDetail::count(conn)?;
    if rows == 0 {
        info!("activity_detail table is already empty");
        return Ok(CleanupOutcome::AlreadyEmpty);
    }

    if !confirm(rows) {
        info!("Cleanup declined, keeping {} activity_detail rows", rows);
        return Ok(CleanupOutcome::Declined { rows });
    }

    let deleted = db::transaction(conn, |tx| ActivityDetail::delete_all(tx))?;
    info!("Deleted {} activity_detail rows", deleted);
    Ok(CleanupOutcome::Deleted { rows: deleted })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation() {
        assert!(parse_confirmation("y"));
        assert!(parse_confirmation("Y"));
        assert!(parse_confirmation("yes"));
        assert!(parse_confirmation("Yep\n"));
        assert!(!parse_confirmation("n"));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("\n"));
        assert!(!parse_confirmation("no, yes"));
        assert!(!parse_confirmation(" y"));
    }
}
