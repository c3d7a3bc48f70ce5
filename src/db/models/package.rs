// src/db/models/package.rs

//! Package model - the current row of each dataset

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Current (non-historical) dataset row
#[derive(Debug, Clone)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub owner_org: Option<String>,
    pub state: String,
    pub private: bool,
    pub package_type: String,
    pub metadata_modified: Option<String>,
}

impl Package {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: None,
            owner_org: None,
            state: "active".to_string(),
            private: false,
            package_type: "dataset".to_string(),
            metadata_modified: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package (id, name, title, owner_org, state, private, type, metadata_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &self.id,
                &self.name,
                &self.title,
                &self.owner_org,
                &self.state,
                self.private,
                &self.package_type,
                &self.metadata_modified,
            ],
        )?;
        Ok(())
    }

    /// Names of every dataset, ordered by name
    pub fn list_names(conn: &Connection) -> Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM package ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Look a dataset up by id, falling back to its name
    pub fn find_by_id_or_name(conn: &Connection, id_or_name: &str) -> Result<Option<Self>> {
        let package = conn
            .query_row(
                "SELECT id, name, title, owner_org, state, private, type, metadata_modified
                 FROM package WHERE id = ?1
                 UNION ALL
                 SELECT id, name, title, owner_org, state, private, type, metadata_modified
                 FROM package WHERE name = ?1 AND id != ?1
                 LIMIT 1",
                [id_or_name],
                Self::from_row,
            )
            .optional()?;
        Ok(package)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            title: row.get(2)?,
            owner_org: row.get(3)?,
            state: row.get(4)?,
            private: row.get(5)?,
            package_type: row.get(6)?,
            metadata_modified: row.get(7)?,
        })
    }
}
