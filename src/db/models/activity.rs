// src/db/models/activity.rs

//! Activity model - the append-only change-event log
//!
//! Rows are created by the running application. The backfill only ever
//! rewrites the `data` column of existing rows.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Kind of change an activity records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityType {
    NewPackage,
    ChangedPackage,
    DeletedPackage,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::NewPackage => "new package",
            ActivityType::ChangedPackage => "changed package",
            ActivityType::DeletedPackage => "deleted package",
            ActivityType::Other(s) => s,
        }
    }
}

impl FromStr for ActivityType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "new package" => ActivityType::NewPackage,
            "changed package" => ActivityType::ChangedPackage,
            "deleted package" => ActivityType::DeletedPackage,
            other => ActivityType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded change to a dataset
#[derive(Debug, Clone)]
pub struct Activity {
    pub id: String,
    pub timestamp: String,
    pub user_id: String,
    pub object_id: String,
    pub revision_id: Option<String>,
    pub activity_type: ActivityType,
    pub data: Value,
}

/// An activity as returned by the listing, with its visibility
#[derive(Debug, Clone)]
pub struct ListedActivity {
    pub activity: Activity,
    /// Generated by an automated actor and left out of normal display
    pub hidden: bool,
}

/// Visibility options for listing a dataset's activities
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub include_hidden: bool,
    /// Actor ids whose activities are hidden
    pub hidden_user_ids: HashSet<String>,
}

const COLUMNS: &str = "id, timestamp, user_id, object_id, revision_id, activity_type, data";

impl Activity {
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        user_id: impl Into<String>,
        object_id: impl Into<String>,
        revision_id: Option<String>,
        activity_type: ActivityType,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            user_id: user_id.into(),
            object_id: object_id.into(),
            revision_id,
            activity_type,
            data: Value::Object(Default::default()),
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO activity (id, timestamp, user_id, object_id, revision_id, activity_type, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &self.id,
                &self.timestamp,
                &self.user_id,
                &self.object_id,
                &self.revision_id,
                self.activity_type.as_str(),
                serde_json::to_string(&self.data)?,
            ],
        )?;
        Ok(())
    }

    /// Read an activity straight from the table
    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let activity = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM activity WHERE id = ?1"),
                [id],
                Self::from_row,
            )
            .optional()?;
        Ok(activity)
    }

    /// List a dataset's activities, oldest first
    pub fn list_for_object(
        conn: &Connection,
        object_id: &str,
        filter: &ActivityFilter,
    ) -> Result<Vec<ListedActivity>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM activity WHERE object_id = ?1 ORDER BY timestamp ASC, id ASC"
        ))?;

        let activities = stmt
            .query_map([object_id], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(activities
            .into_iter()
            .map(|activity| {
                let hidden = filter.hidden_user_ids.contains(&activity.user_id);
                ListedActivity { activity, hidden }
            })
            .filter(|listed| filter.include_hidden || !listed.hidden)
            .collect())
    }

    /// Overwrite the data column; returns false if no such row exists
    pub fn update_data(conn: &Connection, id: &str, data: &Value) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE activity SET data = ?1 WHERE id = ?2",
            params![serde_json::to_string(data)?, id],
        )?;
        Ok(changed > 0)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let activity_type: String = row.get(5)?;
        let data: String = row.get(6)?;
        let data = serde_json::from_str(&data).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            user_id: row.get(2)?,
            object_id: row.get(3)?,
            revision_id: row.get(4)?,
            activity_type: activity_type.parse().unwrap_or(ActivityType::Other(activity_type)),
            data,
        })
    }
}
