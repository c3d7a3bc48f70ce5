// src/db/models/mod.rs

//! Data models for catalogue database entities
//!
//! Each model corresponds to a table and provides the handful of reads and
//! writes the backfill needs. Revision tables are read-only from the
//! backfill's point of view; their `insert` methods exist for seeding.

mod activity;
mod activity_detail;
mod package;
mod revision;
mod tracking;
mod user;

pub use activity::{Activity, ActivityFilter, ActivityType, ListedActivity};
pub use activity_detail::ActivityDetail;
pub use package::Package;
pub use revision::{
    ExtraRevision, GroupRevision, PackageRevision, ResourceRevision, Revision, TagRevision,
};
pub use tracking::TrackingSummary;
pub use user::User;
