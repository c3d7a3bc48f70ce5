// src/lib.rs

//! Activity snapshot backfill
//!
//! Walks every dataset's activity stream and attaches to each activity a
//! full snapshot of the dataset as it was at that activity's revision, so
//! old versions can be shown and diffed without the legacy revision tables.
//!
//! # Architecture
//!
//! - Database-first: all state in the catalogue's SQLite database
//! - One transaction per dataset, committed only when something changed
//! - Historical state comes from a pluggable `RevisionStrategy`
//! - Idempotent: activities that already hold a full snapshot are skipped

pub mod cleanup;
pub mod config;
pub mod dataset;
pub mod db;
mod error;
pub mod migrate;
pub mod normalize;
pub mod progress;
pub mod reconstruct;
pub mod session;

pub use cleanup::{CleanupOutcome, parse_confirmation, wipe_activity_detail};
pub use config::AppConfig;
pub use dataset::{DatasetView, ExtraView, OrganizationView, ResourceView, TagView};
pub use error::{Error, Result};
pub use migrate::{
    Checkpoint, DatasetReport, MigrationOptions, Migrator, RunSummary, SnapshotPayload,
    is_fully_migrated,
};
pub use progress::{
    CallbackReporter, ConsoleReporter, LogReporter, MigrationEvent, MigrationReporter,
    SilentReporter,
};
pub use reconstruct::{LegacyRevisionStrategy, Reconstructor, RevisionStrategy, ShowRequest};
pub use session::UnitOfWork;
