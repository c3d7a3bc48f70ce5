// src/migrate/mod.rs

//! Activity snapshot backfill
//!
//! For every dataset, walk its activities oldest first, rebuild the dataset
//! as of each activity's revision, normalize it and attach it to the
//! activity as `{dataset, actor}`. Activities that already hold a full
//! snapshot are left alone, so a run can be repeated or restarted at any
//! point.
//!
//! # Units of work
//!
//! Each dataset is one transaction: all of its payload writes are committed
//! together, once, and only if something changed. A failure part-way
//! through a dataset rolls its writes back; earlier datasets stay migrated.
//!
//! # Hidden activities
//!
//! Activities by automated actors are hidden from normal display but are
//! still migrated, because the change view of the next visible activity
//! diffs against whatever activity immediately precedes it.

mod checkpoint;
mod guard;

pub use checkpoint::{Checkpoint, CheckpointState};
pub use guard::{DATASET_KEY, LEGACY_DATASET_KEY, SnapshotPayload, is_fully_migrated};

use crate::config::AppConfig;
use crate::db::models::{Activity, ActivityFilter, Package, User};
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::progress::{MigrationEvent, MigrationReporter};
use crate::reconstruct::Reconstructor;
use crate::session::UnitOfWork;
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Every dataset name, in a stable order
pub fn enumerate_datasets(conn: &Connection) -> Result<Vec<String>> {
    Package::list_names(conn)
}

/// Display name for an activity's actor
///
/// Users can be deleted after the fact; their raw id stands in for the name.
pub fn resolve_actor(conn: &Connection, user_id: &str) -> Result<String> {
    Ok(match User::find_by_id(conn, user_id)? {
        Some(user) => user.name,
        None => {
            debug!("Actor {} no longer exists, using the raw id", user_id);
            user_id.to_string()
        }
    })
}

/// Actor ids for a list of configured user names or ids
pub fn resolve_hidden_users(conn: &Connection, users: &[String]) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for user in users {
        if let Some(found) = User::find_by_name(conn, user)? {
            ids.insert(found.id);
        }
        ids.insert(user.clone());
    }
    Ok(ids)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationOptions {
    /// Roll back every unit of work instead of committing
    pub dry_run: bool,
    /// Record a failing dataset and move on
    pub continue_on_error: bool,
}

/// Outcome of migrating one dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetReport {
    pub dataset: String,
    pub activities: usize,
    pub hidden: usize,
    pub updated: usize,
    pub already_recorded: usize,
    pub committed: bool,
}

/// Outcome of a full run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub migrated: Vec<DatasetReport>,
    /// Datasets skipped because the checkpoint was past them
    pub resumed: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn commits(&self) -> usize {
        self.migrated.iter().filter(|r| r.committed).count()
    }

    pub fn updated(&self) -> usize {
        self.migrated.iter().map(|r| r.updated).sum()
    }

    pub fn without_activities(&self) -> usize {
        self.migrated.iter().filter(|r| r.activities == 0).count()
    }

    /// Error for the caller when any dataset failed
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(Error::MigrationFailed {
                failed: self.failed.len(),
                total: self.total,
            })
        }
    }
}

/// Drives the per-dataset walk
pub struct Migrator<'r> {
    reconstructor: Reconstructor,
    hidden_users: Vec<String>,
    options: MigrationOptions,
    reporter: &'r dyn MigrationReporter,
}

impl<'r> Migrator<'r> {
    pub fn new(reconstructor: Reconstructor, reporter: &'r dyn MigrationReporter) -> Self {
        Self {
            reconstructor,
            hidden_users: Vec::new(),
            options: MigrationOptions::default(),
            reporter,
        }
    }

    /// Migrator with the legacy strategy and the configured visibility rules
    pub fn from_config(config: &AppConfig, reporter: &'r dyn MigrationReporter) -> Self {
        Self::new(Reconstructor::legacy(), reporter)
            .with_hidden_users(config.activity.hidden_users())
            .with_options(MigrationOptions {
                dry_run: false,
                continue_on_error: config.migration.continue_on_error,
            })
    }

    pub fn with_hidden_users(mut self, users: Vec<String>) -> Self {
        self.hidden_users = users;
        self
    }

    pub fn with_options(mut self, options: MigrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach snapshots to every activity of one dataset
    pub fn migrate_dataset(&self, conn: &mut Connection, dataset: &str) -> Result<DatasetReport> {
        let package = Package::find_by_id_or_name(conn, dataset)?
            .ok_or_else(|| Error::not_found("Dataset", dataset))?;

        let filter = ActivityFilter {
            include_hidden: true,
            hidden_user_ids: resolve_hidden_users(conn, &self.hidden_users)?,
        };
        let activities = Activity::list_for_object(conn, &package.id, &filter)?;

        let mut report = DatasetReport {
            dataset: dataset.to_string(),
            activities: activities.len(),
            hidden: activities.iter().filter(|a| a.hidden).count(),
            ..Default::default()
        };

        if activities.is_empty() {
            self.reporter.report(&MigrationEvent::NoActivities {
                dataset: dataset.to_string(),
            });
            return Ok(report);
        }

        let total = activities.len();
        let mut unit = UnitOfWork::begin(conn)?;

        for (i, listed) in activities.iter().enumerate() {
            let activity = &listed.activity;
            self.reporter.report(&MigrationEvent::ActivityStarted {
                index: i + 1,
                total,
                timestamp: activity.timestamp.clone(),
            });

            let revision_id = activity
                .revision_id
                .as_deref()
                .ok_or_else(|| Error::not_found("Revision for activity", &activity.id))?;

            let mut snapshot =
                self.reconstructor
                    .reconstruct(unit.conn(), &activity.object_id, revision_id)?;
            normalize(&mut snapshot);

            let actor = resolve_actor(unit.conn(), &activity.user_id)?;

            let current = unit.get_event_by_id(&activity.id)?;
            if is_fully_migrated(&current) {
                self.reporter.report(&MigrationEvent::AlreadyRecorded {
                    activity_id: activity.id.clone(),
                });
                report.already_recorded += 1;
                continue;
            }

            let payload = SnapshotPayload::new(snapshot, actor).to_value()?;
            if unit.set_payload(&activity.id, &payload)? {
                report.updated += 1;
            }
        }

        if self.options.dry_run {
            if report.updated > 0 {
                self.reporter.report(&MigrationEvent::WouldSave {
                    dataset: dataset.to_string(),
                    payloads: report.updated,
                });
            }
            unit.discard()?;
        } else if unit.commit_if_dirty()? {
            report.committed = true;
            self.reporter.report(&MigrationEvent::Saved {
                dataset: dataset.to_string(),
                payloads: report.updated,
            });
        }

        self.reporter.report(&MigrationEvent::DatasetFinished {
            dataset: dataset.to_string(),
            activities: total,
        });
        info!(
            "Migrated {}: {} activities ({} hidden), {} updated, {} already recorded",
            dataset, total, report.hidden, report.updated, report.already_recorded
        );

        Ok(report)
    }

    /// Migrate every dataset, optionally resuming from a checkpoint
    pub fn migrate_all(
        &self,
        conn: &mut Connection,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<RunSummary> {
        let datasets = enumerate_datasets(conn)?;
        let total = datasets.len();
        let start = match checkpoint {
            Some(checkpoint) => checkpoint.resume_index(&datasets)?,
            None => 0,
        };

        info!(
            "Migrating {} datasets using the {} revision strategy",
            total,
            self.reconstructor.strategy_name()
        );
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        for (i, dataset) in datasets.iter().enumerate() {
            self.reporter.report(&MigrationEvent::DatasetStarted {
                index: i + 1,
                total,
                dataset: dataset.clone(),
            });

            if i < start {
                self.reporter.report(&MigrationEvent::DatasetResumed {
                    dataset: dataset.clone(),
                });
                info!("Skipping {} (completed in an earlier run)", dataset);
                summary.resumed.push(dataset.clone());
                continue;
            }

            match self.migrate_dataset(conn, dataset) {
                Ok(report) => {
                    summary.migrated.push(report);
                    // Only a contiguous run of successes moves the resume point
                    if let Some(checkpoint) = checkpoint
                        && summary.failed.is_empty()
                        && !self.options.dry_run
                    {
                        checkpoint.record(dataset)?;
                    }
                }
                Err(e) if self.options.continue_on_error => {
                    warn!("Dataset {} failed: {}", dataset, e);
                    self.reporter.report(&MigrationEvent::DatasetFailed {
                        dataset: dataset.clone(),
                        error: e.to_string(),
                    });
                    summary.failed.push((dataset.clone(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(checkpoint) = checkpoint
            && summary.is_success()
            && !self.options.dry_run
        {
            checkpoint.clear()?;
        }

        info!(
            "Run finished: {} datasets, {} commits, {} payloads updated, {} failed",
            total,
            summary.commits(),
            summary.updated(),
            summary.failed.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_actor_falls_back_to_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ckan.db");
        db::init(&path).unwrap();
        let conn = db::open(&path).unwrap();
        User::new("user-1", "alice").insert(&conn).unwrap();

        assert_eq!(resolve_actor(&conn, "user-1").unwrap(), "alice");
        assert_eq!(resolve_actor(&conn, "U-missing").unwrap(), "U-missing");
    }

    #[test]
    fn test_resolve_hidden_users_by_name_and_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ckan.db");
        db::init(&path).unwrap();
        let conn = db::open(&path).unwrap();
        User::new("site-id", "default").insert(&conn).unwrap();

        let ids = resolve_hidden_users(&conn, &["default".to_string(), "harvest-id".to_string()])
            .unwrap();
        assert!(ids.contains("site-id"));
        assert!(ids.contains("harvest-id"));
    }

    #[test]
    fn test_summary_into_result() {
        let ok = RunSummary {
            total: 2,
            ..Default::default()
        };
        assert!(ok.into_result().is_ok());

        let failed = RunSummary {
            total: 2,
            failed: vec![("census".to_string(), "boom".to_string())],
            ..Default::default()
        };
        assert!(matches!(
            failed.into_result(),
            Err(Error::MigrationFailed { failed: 1, total: 2 })
        ));
    }
}
