// src/db/migrations.rs
//! Database migration implementations
//!
//! Each function creates or evolves the catalogue tables for one schema
//! version. The layout mirrors the legacy revisioned catalogue: every
//! `*_revision` table keeps one row per object per revision, valid from
//! `revision_timestamp` until `expired_timestamp` (NULL while current).

use crate::error::Result;
use rusqlite::Connection;
use tracing::debug;

/// Initial schema - Version 1
///
/// Creates the catalogue tables the backfill reads and writes:
/// - user: actors referenced by activities
/// - revision: revision markers and their timestamps
/// - package and the *_revision tables: historical dataset state
/// - activity: the append-only change-event log
/// - activity_detail: the obsolete per-object detail store
/// - tracking_summary: page view counters
pub fn migrate_v1(conn: &Connection) -> Result<()> {
    debug!("Creating schema version 1");

    conn.execute_batch(
        "
        CREATE TABLE \"user\" (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            fullname TEXT,
            sysadmin INTEGER NOT NULL DEFAULT 0,
            state TEXT NOT NULL DEFAULT 'active',
            created TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE revision (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            author TEXT,
            message TEXT
        );

        -- Current dataset rows
        CREATE TABLE package (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            title TEXT,
            owner_org TEXT,
            state TEXT NOT NULL DEFAULT 'active',
            private INTEGER NOT NULL DEFAULT 0,
            type TEXT NOT NULL DEFAULT 'dataset',
            metadata_modified TEXT
        );

        CREATE TABLE package_revision (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            name TEXT NOT NULL,
            title TEXT,
            notes TEXT,
            url TEXT,
            version TEXT,
            license_id TEXT,
            author TEXT,
            author_email TEXT,
            maintainer TEXT,
            maintainer_email TEXT,
            owner_org TEXT,
            state TEXT NOT NULL DEFAULT 'active',
            private INTEGER NOT NULL DEFAULT 0,
            type TEXT NOT NULL DEFAULT 'dataset',
            metadata_created TEXT,
            metadata_modified TEXT,
            revision_timestamp TEXT NOT NULL,
            expired_timestamp TEXT,
            PRIMARY KEY (id, revision_id)
        );

        CREATE TABLE resource_revision (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            package_id TEXT NOT NULL,
            url TEXT NOT NULL DEFAULT '',
            name TEXT,
            description TEXT,
            format TEXT,
            mimetype TEXT,
            size INTEGER,
            position INTEGER NOT NULL DEFAULT 0,
            state TEXT NOT NULL DEFAULT 'active',
            revision_timestamp TEXT NOT NULL,
            expired_timestamp TEXT,
            PRIMARY KEY (id, revision_id)
        );

        CREATE TABLE package_tag_revision (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            package_id TEXT NOT NULL,
            tag_name TEXT NOT NULL,
            vocabulary_id TEXT,
            state TEXT NOT NULL DEFAULT 'active',
            revision_timestamp TEXT NOT NULL,
            expired_timestamp TEXT,
            PRIMARY KEY (id, revision_id)
        );

        CREATE TABLE package_extra_revision (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            package_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT,
            state TEXT NOT NULL DEFAULT 'active',
            revision_timestamp TEXT NOT NULL,
            expired_timestamp TEXT,
            PRIMARY KEY (id, revision_id)
        );

        -- Organizations are groups with is_organization set
        CREATE TABLE group_revision (
            id TEXT NOT NULL,
            revision_id TEXT NOT NULL,
            name TEXT NOT NULL,
            title TEXT,
            description TEXT,
            image_url TEXT,
            type TEXT NOT NULL DEFAULT 'organization',
            is_organization INTEGER NOT NULL DEFAULT 1,
            approval_status TEXT,
            state TEXT NOT NULL DEFAULT 'active',
            revision_timestamp TEXT NOT NULL,
            expired_timestamp TEXT,
            PRIMARY KEY (id, revision_id)
        );

        CREATE TABLE activity (
            id TEXT PRIMARY KEY,
            timestamp TEXT NOT NULL,
            user_id TEXT NOT NULL,
            object_id TEXT NOT NULL,
            revision_id TEXT,
            activity_type TEXT NOT NULL,
            data TEXT NOT NULL DEFAULT '{}'
        );

        CREATE TABLE activity_detail (
            id TEXT PRIMARY KEY,
            activity_id TEXT NOT NULL,
            object_id TEXT,
            object_type TEXT,
            activity_type TEXT,
            data TEXT
        );

        CREATE TABLE tracking_summary (
            package_id TEXT NOT NULL,
            tracking_date TEXT NOT NULL,
            count INTEGER NOT NULL DEFAULT 0,
            running_total INTEGER NOT NULL DEFAULT 0,
            recent_views INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (package_id, tracking_date)
        );
        ",
    )?;

    Ok(())
}

/// Version 2 - lookup indexes for the per-dataset walk
pub fn migrate_v2(conn: &Connection) -> Result<()> {
    debug!("Migrating to schema version 2");

    conn.execute_batch(
        "
        CREATE INDEX idx_activity_object_timestamp ON activity(object_id, timestamp);
        CREATE INDEX idx_activity_detail_activity ON activity_detail(activity_id);
        CREATE INDEX idx_resource_revision_package ON resource_revision(package_id);
        CREATE INDEX idx_package_tag_revision_package ON package_tag_revision(package_id);
        CREATE INDEX idx_package_extra_revision_package ON package_extra_revision(package_id);
        ",
    )?;

    Ok(())
}
