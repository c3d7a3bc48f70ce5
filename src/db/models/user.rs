// src/db/models/user.rs

//! User model - actors referenced by activities

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub fullname: Option<String>,
    pub sysadmin: bool,
    pub state: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fullname: None,
            sysadmin: false,
            state: "active".to_string(),
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO \"user\" (id, name, fullname, sysadmin, state) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![&self.id, &self.name, &self.fullname, self.sysadmin, &self.state],
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let user = conn
            .query_row(
                "SELECT id, name, fullname, sysadmin, state FROM \"user\" WHERE id = ?1",
                [id],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let user = conn
            .query_row(
                "SELECT id, name, fullname, sysadmin, state FROM \"user\" WHERE name = ?1",
                [name],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            fullname: row.get(2)?,
            sysadmin: row.get(3)?,
            state: row.get(4)?,
        })
    }
}
