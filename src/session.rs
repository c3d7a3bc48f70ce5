// src/session.rs

//! Unit of work over the activity table
//!
//! One `UnitOfWork` is opened per dataset. Payload writes go into an open
//! transaction so later reads in the same unit see them, and the whole
//! dataset is committed once, or discarded, at the end. Dropping a unit
//! without committing rolls it back.

use crate::db::models::Activity;
use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    dirty: BTreeSet<String>,
}

impl<'conn> UnitOfWork<'conn> {
    pub fn begin(conn: &'conn mut Connection) -> Result<Self> {
        Ok(Self {
            tx: conn.transaction()?,
            dirty: BTreeSet::new(),
        })
    }

    /// Connection view inside the open transaction
    pub fn conn(&self) -> &Connection {
        &self.tx
    }

    /// Fresh read of an activity, including writes staged in this unit
    pub fn get_event_by_id(&self, id: &str) -> Result<Activity> {
        Activity::find_by_id(&self.tx, id)?.ok_or_else(|| Error::not_found("Activity", id))
    }

    /// Replace an activity's payload
    ///
    /// Returns false, and leaves the unit clean, when the stored payload is
    /// already equal to `payload`.
    pub fn set_payload(&mut self, id: &str, payload: &Value) -> Result<bool> {
        let current = self.get_event_by_id(id)?;
        if &current.data == payload {
            debug!("Payload of activity {} unchanged", id);
            return Ok(false);
        }

        Activity::update_data(&self.tx, id, payload)?;
        self.dirty.insert(id.to_string());
        Ok(true)
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Commit if anything was written; returns whether a commit happened
    pub fn commit_if_dirty(self) -> Result<bool> {
        if !self.is_dirty() {
            self.tx.rollback()?;
            return Ok(false);
        }

        debug!("Committing {} activity payloads", self.dirty.len());
        self.tx.commit()?;
        Ok(true)
    }

    /// Throw away everything staged in this unit
    pub fn discard(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::models::ActivityType;
    use serde_json::json;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ckan.db");
        db::init(&path).unwrap();
        let conn = db::open(&path).unwrap();
        Activity::new(
            "act-1",
            "2018-04-20T16:11:45",
            "user-1",
            "pkg-1",
            Some("rev-1".to_string()),
            ActivityType::ChangedPackage,
        )
        .insert(&conn)
        .unwrap();
        (dir, conn)
    }

    #[test]
    fn test_commit_only_when_dirty() {
        let (_dir, mut conn) = setup();

        let unit = UnitOfWork::begin(&mut conn).unwrap();
        assert!(!unit.commit_if_dirty().unwrap());

        let mut unit = UnitOfWork::begin(&mut conn).unwrap();
        assert!(unit.set_payload("act-1", &json!({"actor": "alice"})).unwrap());
        assert_eq!(unit.get_event_by_id("act-1").unwrap().data["actor"], "alice");
        assert!(unit.commit_if_dirty().unwrap());

        let stored = Activity::find_by_id(&conn, "act-1").unwrap().unwrap();
        assert_eq!(stored.data, json!({"actor": "alice"}));
    }

    #[test]
    fn test_equal_payload_is_not_dirty() {
        let (_dir, mut conn) = setup();

        let mut unit = UnitOfWork::begin(&mut conn).unwrap();
        assert!(!unit.set_payload("act-1", &json!({})).unwrap());
        assert!(!unit.is_dirty());
    }

    #[test]
    fn test_discard_and_drop_roll_back() {
        let (_dir, mut conn) = setup();

        let mut unit = UnitOfWork::begin(&mut conn).unwrap();
        unit.set_payload("act-1", &json!({"actor": "bob"})).unwrap();
        unit.discard().unwrap();

        {
            let mut unit = UnitOfWork::begin(&mut conn).unwrap();
            unit.set_payload("act-1", &json!({"actor": "carol"})).unwrap();
        }

        let stored = Activity::find_by_id(&conn, "act-1").unwrap().unwrap();
        assert_eq!(stored.data, json!({}));
    }

    #[test]
    fn test_missing_activity() {
        let (_dir, mut conn) = setup();
        let mut unit = UnitOfWork::begin(&mut conn).unwrap();
        let err = unit.set_payload("act-404", &json!({})).unwrap_err();
        assert!(err.is_not_found());
    }
}
