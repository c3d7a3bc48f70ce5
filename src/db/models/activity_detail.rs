// src/db/models/activity_detail.rs

//! Activity detail model - the obsolete per-object detail store

use crate::error::Result;
use rusqlite::{Connection, params};

#[derive(Debug, Clone)]
pub struct ActivityDetail {
    pub id: String,
    pub activity_id: String,
    pub object_id: Option<String>,
    pub object_type: Option<String>,
    pub activity_type: Option<String>,
    pub data: Option<String>,
}

impl ActivityDetail {
    pub fn new(id: impl Into<String>, activity_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            activity_id: activity_id.into(),
            object_id: None,
            object_type: None,
            activity_type: None,
            data: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO activity_detail (id, activity_id, object_id, object_type, activity_type, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &self.id,
                &self.activity_id,
                &self.object_id,
                &self.object_type,
                &self.activity_type,
                &self.data,
            ],
        )?;
        Ok(())
    }

    pub fn count(conn: &Connection) -> Result<u64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM activity_detail", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete every row, returning how many were removed
    pub fn delete_all(conn: &Connection) -> Result<usize> {
        Ok(conn.execute("DELETE FROM activity_detail", [])?)
    }
}
