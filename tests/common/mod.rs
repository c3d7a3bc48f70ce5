// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use activity_backfill::db;
use activity_backfill::db::models::{
    Activity, ActivityType, GroupRevision, Package, PackageRevision, ResourceRevision, Revision,
    TagRevision, User,
};
use activity_backfill::{DatasetView, LegacyRevisionStrategy, RevisionStrategy, ShowRequest};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const SITE_USER_ID: &str = "site-user-id";
pub const SITE_USER: &str = "default";
pub const ALICE_ID: &str = "user-alice";

/// A seeded catalogue database.
///
/// Keep the struct alive to prevent the temp dir from being removed.
pub struct TestDb {
    pub dir: TempDir,
    pub path: PathBuf,
    pub conn: Connection,
}

/// Create an empty catalogue with the site user and alice.
pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ckan.db");
    db::init(&path).unwrap();
    let conn = db::open(&path).unwrap();

    User::new(SITE_USER_ID, SITE_USER).insert(&conn).unwrap();
    User::new(ALICE_ID, "alice").insert(&conn).unwrap();

    TestDb { dir, path, conn }
}

pub fn timestamp(day: u32) -> String {
    format!("2018-01-{day:02}T10:00:00.000000")
}

/// Add a dataset with one version per `(revision_id, day)`.
///
/// Version N is titled "{title_prefix} vN" and expires when version N+1
/// starts. The dataset owns org-1 and keeps resource `{id}-res-1` from the
/// first revision; a second resource appears at the third revision.
pub fn add_dataset(conn: &Connection, id: &str, name: &str, versions: &[(&str, u32)]) {
    Package::new(id, name).insert(conn).unwrap();

    if GroupRevision::organization_valid_at(conn, "org-1", &timestamp(28))
        .unwrap()
        .is_none()
    {
        let mut org = GroupRevision::organization("org-1", "rev-org", "stats-office", timestamp(1));
        org.title = Some("Statistics Office".to_string());
        org.insert(conn).unwrap();
    }

    for (n, (rev_id, day)) in versions.iter().enumerate() {
        if Revision::find_by_id(conn, rev_id).unwrap().is_none() {
            Revision::new(*rev_id, timestamp(*day)).insert(conn).unwrap();
        }

        let mut version = PackageRevision::new(id, *rev_id, name, timestamp(*day));
        version.title = Some(format!("{} v{}", name, n + 1));
        version.owner_org = Some("org-1".to_string());
        version.expired_timestamp = versions.get(n + 1).map(|(_, next)| timestamp(*next));
        version.insert(conn).unwrap();

        if n == 0 {
            let mut res = ResourceRevision::new(
                format!("{id}-res-1"),
                *rev_id,
                id,
                format!("http://example.com/{name}.csv"),
                timestamp(*day),
            );
            res.format = Some("CSV".to_string());
            res.insert(conn).unwrap();

            TagRevision::new(format!("{id}-tag-1"), *rev_id, id, "statistics", timestamp(*day))
                .insert(conn)
                .unwrap();
        }

        if n == 2 {
            let mut res = ResourceRevision::new(
                format!("{id}-res-2"),
                *rev_id,
                id,
                format!("http://example.com/{name}.json"),
                timestamp(*day),
            );
            res.position = 1;
            res.insert(conn).unwrap();
        }
    }
}

pub fn add_activity(conn: &Connection, id: &str, day: u32, user_id: &str, object_id: &str, rev: &str) {
    let activity_type = if day == 1 {
        ActivityType::NewPackage
    } else {
        ActivityType::ChangedPackage
    };
    Activity::new(id, timestamp(day), user_id, object_id, Some(rev.to_string()), activity_type)
        .insert(conn)
        .unwrap();
}

/// "census" with four revisions and activities [H1, E2, H3, E4],
/// where the H activities are by the site user.
pub fn seed_census(conn: &Connection) {
    add_dataset(
        conn,
        "pkg-census",
        "census",
        &[("r1", 1), ("r2", 2), ("r3", 3), ("r4", 4)],
    );
    add_activity(conn, "a1", 1, SITE_USER_ID, "pkg-census", "r1");
    add_activity(conn, "a2", 2, ALICE_ID, "pkg-census", "r2");
    add_activity(conn, "a3", 3, SITE_USER_ID, "pkg-census", "r3");
    add_activity(conn, "a4", 4, ALICE_ID, "pkg-census", "r4");
}

/// Raw text of an activity's data column.
pub fn raw_data(conn: &Connection, id: &str) -> String {
    conn.query_row("SELECT data FROM activity WHERE id = ?1", [id], |row| row.get(0))
        .unwrap()
}

pub fn data(conn: &Connection, id: &str) -> serde_json::Value {
    Activity::find_by_id(conn, id).unwrap().unwrap().data
}

/// One `package_show` call as the strategy saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub dataset_id: String,
    pub revision_id: String,
    pub include_tracking: bool,
}

/// Legacy strategy that records every request it receives.
#[derive(Clone, Default)]
pub struct RecordingStrategy {
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingStrategy {
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn revisions(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.revision_id)
            .collect()
    }
}

impl RevisionStrategy for RecordingStrategy {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn package_show(
        &self,
        conn: &Connection,
        request: &ShowRequest<'_>,
    ) -> activity_backfill::Result<DatasetView> {
        self.requests.lock().unwrap().push(RecordedRequest {
            dataset_id: request.dataset_id.to_string(),
            revision_id: request.revision_id.to_string(),
            include_tracking: request.include_tracking,
        });
        LegacyRevisionStrategy.package_show(conn, request)
    }
}
