// src/commands/mod.rs
//! Command handlers for the activity-backfill CLI

mod cleanup;
mod migrate;

pub use cleanup::cmd_cleanup;
pub use migrate::{RunOptions, cmd_migrate_all, cmd_migrate_dataset};
