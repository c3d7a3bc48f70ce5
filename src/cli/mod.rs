// src/cli/mod.rs
//! CLI definitions for activity-backfill
//!
//! The tool has a single mode of operation:
//! - no `--dataset`: migrate every dataset, then offer to empty the
//!   obsolete `activity_detail` table
//! - `--dataset NAME`: migrate just that dataset, no cleanup
//!
//! The command implementations are in the `commands` module.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "activity-backfill")]
#[command(author = "Activity Backfill Contributors")]
#[command(version)]
#[command(
    about = "Backfill dataset snapshots into the activity stream from legacy revisions",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: PathBuf,

    /// Just migrate this particular dataset - specify its name or id
    #[arg(long, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Carry on past datasets that fail and report them at the end
    #[arg(long)]
    pub keep_going: bool,

    /// Reconstruct and check every activity but commit nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Answer yes to the activity_detail cleanup prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Only log, do not print per-activity progress
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_config_is_required() {
        assert!(Cli::try_parse_from(["activity-backfill"]).is_err());
        assert!(Cli::try_parse_from(["activity-backfill", "--dataset", "census"]).is_err());
    }

    #[test]
    fn test_single_dataset() {
        let cli =
            Cli::try_parse_from(["activity-backfill", "-c", "backfill.toml", "--dataset", "census"])
                .unwrap();
        assert_eq!(cli.config, PathBuf::from("backfill.toml"));
        assert_eq!(cli.dataset.as_deref(), Some("census"));
        assert!(!cli.keep_going);
        assert!(!cli.dry_run);
    }
}
