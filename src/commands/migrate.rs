// src/commands/migrate.rs

//! Migrate command - attach dataset snapshots to activities

use activity_backfill::{
    AppConfig, Checkpoint, ConsoleReporter, LogReporter, MigrationOptions, MigrationReporter,
    Migrator, RunSummary,
};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Flags that shape a run, on top of the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub keep_going: bool,
    pub dry_run: bool,
    pub quiet: bool,
}

fn reporter(options: &RunOptions) -> Box<dyn MigrationReporter> {
    if options.quiet {
        Box::new(LogReporter)
    } else {
        Box::new(ConsoleReporter::new())
    }
}

fn migrator<'r>(
    config: &AppConfig,
    options: &RunOptions,
    reporter: &'r dyn MigrationReporter,
) -> Migrator<'r> {
    Migrator::from_config(config, reporter).with_options(MigrationOptions {
        dry_run: options.dry_run,
        continue_on_error: options.keep_going || config.migration.continue_on_error,
    })
}

/// Migrate a single dataset
pub fn cmd_migrate_dataset(
    conn: &mut Connection,
    config: &AppConfig,
    dataset: &str,
    options: RunOptions,
) -> Result<()> {
    info!("Migrating dataset {} (dry_run={})", dataset, options.dry_run);

    let reporter = reporter(&options);
    let report = migrator(config, &options, reporter.as_ref()).migrate_dataset(conn, dataset)?;

    if options.dry_run {
        println!(
            "Dry run: {} of {} activities would be updated",
            report.updated, report.activities
        );
    }
    Ok(())
}

/// Migrate every dataset, resuming from the configured checkpoint
///
/// Returns the run summary when every dataset succeeded.
pub fn cmd_migrate_all(
    conn: &mut Connection,
    config: &AppConfig,
    options: RunOptions,
) -> Result<RunSummary> {
    let reporter = reporter(&options);
    let migrator = migrator(config, &options, reporter.as_ref());
    let checkpoint = config.migration.checkpoint_file.as_ref().map(Checkpoint::new);

    if let Some(checkpoint) = &checkpoint {
        info!("Using checkpoint file {}", checkpoint.path().display());
    }

    let summary = migrator.migrate_all(conn, checkpoint.as_ref())?;
    print_summary(&summary, options.dry_run);

    Ok(summary.into_result()?)
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    println!();
    println!("Datasets:              {}", summary.total);
    if !summary.resumed.is_empty() {
        println!("  Done in earlier run: {}", summary.resumed.len());
    }
    println!("  Migrated:            {}", summary.migrated.len());
    println!("  Without activities:  {}", summary.without_activities());
    if dry_run {
        println!("Payloads to update:    {}", summary.updated());
    } else {
        println!("Payloads updated:      {}", summary.updated());
    }

    if !summary.failed.is_empty() {
        println!("  Failed:              {}", summary.failed.len());
        for (dataset, error) in &summary.failed {
            println!("    {}: {}", dataset, error);
        }
    }
}
