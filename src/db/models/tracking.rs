// src/db/models/tracking.rs

//! Page view counters per dataset

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingSummary {
    pub total: i64,
    pub recent: i64,
}

impl TrackingSummary {
    /// Latest counters for a dataset, zero if it was never viewed
    pub fn for_package(conn: &Connection, package_id: &str) -> Result<Self> {
        let summary = conn
            .query_row(
                "SELECT running_total, recent_views FROM tracking_summary
                 WHERE package_id = ?1 ORDER BY tracking_date DESC LIMIT 1",
                [package_id],
                |row| {
                    Ok(Self {
                        total: row.get(0)?,
                        recent: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(summary.unwrap_or_default())
    }

    pub fn record(
        conn: &Connection,
        package_id: &str,
        tracking_date: &str,
        count: i64,
        running_total: i64,
        recent_views: i64,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO tracking_summary (package_id, tracking_date, count, running_total, recent_views)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![package_id, tracking_date, count, running_total, recent_views],
        )?;
        Ok(())
    }
}
