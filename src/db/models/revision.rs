// src/db/models/revision.rs

//! Legacy revision tables
//!
//! Every `*_revision` row is one version of an object. A row is valid at
//! time T when `revision_timestamp <= T` and it has not expired by T.
//! The `valid_at` queries return the versions that were live at a given
//! revision's timestamp.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Validity window predicate shared by every `*_revision` query; `?2` is T
const VALID_AT: &str =
    "revision_timestamp <= ?2 AND (expired_timestamp IS NULL OR expired_timestamp > ?2)";

/// A revision marker and the moment it was made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: String,
    pub timestamp: String,
    pub author: Option<String>,
    pub message: Option<String>,
}

impl Revision {
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            author: None,
            message: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO revision (id, timestamp, author, message) VALUES (?1, ?2, ?3, ?4)",
            params![&self.id, &self.timestamp, &self.author, &self.message],
        )?;
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        let revision = conn
            .query_row(
                "SELECT id, timestamp, author, message FROM revision WHERE id = ?1",
                [id],
                |row| {
                    Ok(Self {
                        id: row.get(0)?,
                        timestamp: row.get(1)?,
                        author: row.get(2)?,
                        message: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(revision)
    }
}

/// One version of a dataset's own fields
#[derive(Debug, Clone)]
pub struct PackageRevision {
    pub id: String,
    pub revision_id: String,
    pub name: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub license_id: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub maintainer: Option<String>,
    pub maintainer_email: Option<String>,
    pub owner_org: Option<String>,
    pub state: String,
    pub private: bool,
    pub package_type: String,
    pub metadata_created: Option<String>,
    pub metadata_modified: Option<String>,
    pub revision_timestamp: String,
    pub expired_timestamp: Option<String>,
}

impl PackageRevision {
    pub fn new(
        id: impl Into<String>,
        revision_id: impl Into<String>,
        name: impl Into<String>,
        revision_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            revision_id: revision_id.into(),
            name: name.into(),
            title: None,
            notes: None,
            url: None,
            version: None,
            license_id: None,
            author: None,
            author_email: None,
            maintainer: None,
            maintainer_email: None,
            owner_org: None,
            state: "active".to_string(),
            private: false,
            package_type: "dataset".to_string(),
            metadata_created: None,
            metadata_modified: None,
            revision_timestamp: revision_timestamp.into(),
            expired_timestamp: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package_revision (id, revision_id, name, title, notes, url, version,
                license_id, author, author_email, maintainer, maintainer_email, owner_org, state,
                private, type, metadata_created, metadata_modified, revision_timestamp,
                expired_timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                ?18, ?19, ?20)",
            params![
                &self.id,
                &self.revision_id,
                &self.name,
                &self.title,
                &self.notes,
                &self.url,
                &self.version,
                &self.license_id,
                &self.author,
                &self.author_email,
                &self.maintainer,
                &self.maintainer_email,
                &self.owner_org,
                &self.state,
                self.private,
                &self.package_type,
                &self.metadata_created,
                &self.metadata_modified,
                &self.revision_timestamp,
                &self.expired_timestamp,
            ],
        )?;
        Ok(())
    }

    /// The dataset row live at `timestamp`
    pub fn valid_at(conn: &Connection, package_id: &str, timestamp: &str) -> Result<Option<Self>> {
        let row = conn
            .query_row(
                &format!(
                    "SELECT id, revision_id, name, title, notes, url, version, license_id, author,
                        author_email, maintainer, maintainer_email, owner_org, state, private, type,
                        metadata_created, metadata_modified, revision_timestamp, expired_timestamp
                     FROM package_revision WHERE id = ?1 AND {VALID_AT}
                     ORDER BY revision_timestamp DESC LIMIT 1"
                ),
                params![package_id, timestamp],
                Self::from_row,
            )
            .optional()?;
        Ok(row)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            revision_id: row.get(1)?,
            name: row.get(2)?,
            title: row.get(3)?,
            notes: row.get(4)?,
            url: row.get(5)?,
            version: row.get(6)?,
            license_id: row.get(7)?,
            author: row.get(8)?,
            author_email: row.get(9)?,
            maintainer: row.get(10)?,
            maintainer_email: row.get(11)?,
            owner_org: row.get(12)?,
            state: row.get(13)?,
            private: row.get(14)?,
            package_type: row.get(15)?,
            metadata_created: row.get(16)?,
            metadata_modified: row.get(17)?,
            revision_timestamp: row.get(18)?,
            expired_timestamp: row.get(19)?,
        })
    }
}

/// One version of a resource
#[derive(Debug, Clone)]
pub struct ResourceRevision {
    pub id: String,
    pub revision_id: String,
    pub package_id: String,
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub mimetype: Option<String>,
    pub size: Option<i64>,
    pub position: i64,
    pub state: String,
    pub revision_timestamp: String,
    pub expired_timestamp: Option<String>,
}

impl ResourceRevision {
    pub fn new(
        id: impl Into<String>,
        revision_id: impl Into<String>,
        package_id: impl Into<String>,
        url: impl Into<String>,
        revision_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            revision_id: revision_id.into(),
            package_id: package_id.into(),
            url: url.into(),
            name: None,
            description: None,
            format: None,
            mimetype: None,
            size: None,
            position: 0,
            state: "active".to_string(),
            revision_timestamp: revision_timestamp.into(),
            expired_timestamp: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO resource_revision (id, revision_id, package_id, url, name, description,
                format, mimetype, size, position, state, revision_timestamp, expired_timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &self.id,
                &self.revision_id,
                &self.package_id,
                &self.url,
                &self.name,
                &self.description,
                &self.format,
                &self.mimetype,
                self.size,
                self.position,
                &self.state,
                &self.revision_timestamp,
                &self.expired_timestamp,
            ],
        )?;
        Ok(())
    }

    /// Active resources of a dataset live at `timestamp`, in display order
    pub fn valid_at(conn: &Connection, package_id: &str, timestamp: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, revision_id, package_id, url, name, description, format, mimetype, size,
                position, state, revision_timestamp, expired_timestamp
             FROM resource_revision
             WHERE package_id = ?1 AND state = 'active' AND {VALID_AT}
             ORDER BY position, id"
        ))?;

        let rows = stmt
            .query_map(params![package_id, timestamp], |row| {
                Ok(Self {
                    id: row.get(0)?,
                    revision_id: row.get(1)?,
                    package_id: row.get(2)?,
                    url: row.get(3)?,
                    name: row.get(4)?,
                    description: row.get(5)?,
                    format: row.get(6)?,
                    mimetype: row.get(7)?,
                    size: row.get(8)?,
                    position: row.get(9)?,
                    state: row.get(10)?,
                    revision_timestamp: row.get(11)?,
                    expired_timestamp: row.get(12)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// One version of a dataset-tag membership
#[derive(Debug, Clone)]
pub struct TagRevision {
    pub id: String,
    pub revision_id: String,
    pub package_id: String,
    pub tag_name: String,
    pub vocabulary_id: Option<String>,
    pub state: String,
    pub revision_timestamp: String,
    pub expired_timestamp: Option<String>,
}

impl TagRevision {
    pub fn new(
        id: impl Into<String>,
        revision_id: impl Into<String>,
        package_id: impl Into<String>,
        tag_name: impl Into<String>,
        revision_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            revision_id: revision_id.into(),
            package_id: package_id.into(),
            tag_name: tag_name.into(),
            vocabulary_id: None,
            state: "active".to_string(),
            revision_timestamp: revision_timestamp.into(),
            expired_timestamp: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package_tag_revision (id, revision_id, package_id, tag_name,
                vocabulary_id, state, revision_timestamp, expired_timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &self.id,
                &self.revision_id,
                &self.package_id,
                &self.tag_name,
                &self.vocabulary_id,
                &self.state,
                &self.revision_timestamp,
                &self.expired_timestamp,
            ],
        )?;
        Ok(())
    }

    pub fn valid_at(conn: &Connection, package_id: &str, timestamp: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, revision_id, package_id, tag_name, vocabulary_id, state,
                revision_timestamp, expired_timestamp
             FROM package_tag_revision
             WHERE package_id = ?1 AND state = 'active' AND {VALID_AT}
             ORDER BY tag_name"
        ))?;

        let rows = stmt
            .query_map(params![package_id, timestamp], |row| {
                Ok(Self {
                    id: row.get(0)?,
                    revision_id: row.get(1)?,
                    package_id: row.get(2)?,
                    tag_name: row.get(3)?,
                    vocabulary_id: row.get(4)?,
                    state: row.get(5)?,
                    revision_timestamp: row.get(6)?,
                    expired_timestamp: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// One version of a free-form key/value extra
#[derive(Debug, Clone)]
pub struct ExtraRevision {
    pub id: String,
    pub revision_id: String,
    pub package_id: String,
    pub key: String,
    pub value: Option<String>,
    pub state: String,
    pub revision_timestamp: String,
    pub expired_timestamp: Option<String>,
}

impl ExtraRevision {
    pub fn new(
        id: impl Into<String>,
        revision_id: impl Into<String>,
        package_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        revision_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            revision_id: revision_id.into(),
            package_id: package_id.into(),
            key: key.into(),
            value: Some(value.into()),
            state: "active".to_string(),
            revision_timestamp: revision_timestamp.into(),
            expired_timestamp: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO package_extra_revision (id, revision_id, package_id, key, value, state,
                revision_timestamp, expired_timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &self.id,
                &self.revision_id,
                &self.package_id,
                &self.key,
                &self.value,
                &self.state,
                &self.revision_timestamp,
                &self.expired_timestamp,
            ],
        )?;
        Ok(())
    }

    pub fn valid_at(conn: &Connection, package_id: &str, timestamp: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, revision_id, package_id, key, value, state, revision_timestamp,
                expired_timestamp
             FROM package_extra_revision
             WHERE package_id = ?1 AND state = 'active' AND {VALID_AT}
             ORDER BY key"
        ))?;

        let rows = stmt
            .query_map(params![package_id, timestamp], |row| {
                Ok(Self {
                    id: row.get(0)?,
                    revision_id: row.get(1)?,
                    package_id: row.get(2)?,
                    key: row.get(3)?,
                    value: row.get(4)?,
                    state: row.get(5)?,
                    revision_timestamp: row.get(6)?,
                    expired_timestamp: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// One version of a group; organizations have `is_organization` set
#[derive(Debug, Clone)]
pub struct GroupRevision {
    pub id: String,
    pub revision_id: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub group_type: String,
    pub is_organization: bool,
    pub approval_status: Option<String>,
    pub state: String,
    pub revision_timestamp: String,
    pub expired_timestamp: Option<String>,
}

impl GroupRevision {
    pub fn organization(
        id: impl Into<String>,
        revision_id: impl Into<String>,
        name: impl Into<String>,
        revision_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            revision_id: revision_id.into(),
            name: name.into(),
            title: None,
            description: None,
            image_url: None,
            group_type: "organization".to_string(),
            is_organization: true,
            approval_status: Some("approved".to_string()),
            state: "active".to_string(),
            revision_timestamp: revision_timestamp.into(),
            expired_timestamp: None,
        }
    }

    pub fn insert(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO group_revision (id, revision_id, name, title, description, image_url,
                type, is_organization, approval_status, state, revision_timestamp,
                expired_timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                &self.id,
                &self.revision_id,
                &self.name,
                &self.title,
                &self.description,
                &self.image_url,
                &self.group_type,
                self.is_organization,
                &self.approval_status,
                &self.state,
                &self.revision_timestamp,
                &self.expired_timestamp,
            ],
        )?;
        Ok(())
    }

    /// The organization row live at `timestamp`
    pub fn organization_valid_at(
        conn: &Connection,
        group_id: &str,
        timestamp: &str,
    ) -> Result<Option<Self>> {
        let row = conn
            .query_row(
                &format!(
                    "SELECT id, revision_id, name, title, description, image_url, type,
                        is_organization, approval_status, state, revision_timestamp,
                        expired_timestamp
                     FROM group_revision WHERE id = ?1 AND is_organization = 1 AND {VALID_AT}
                     ORDER BY revision_timestamp DESC LIMIT 1"
                ),
                params![group_id, timestamp],
                |row| {
                    Ok(Self {
                        id: row.get(0)?,
                        revision_id: row.get(1)?,
                        name: row.get(2)?,
                        title: row.get(3)?,
                        description: row.get(4)?,
                        image_url: row.get(5)?,
                        group_type: row.get(6)?,
                        is_organization: row.get(7)?,
                        approval_status: row.get(8)?,
                        state: row.get(9)?,
                        revision_timestamp: row.get(10)?,
                        expired_timestamp: row.get(11)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}
