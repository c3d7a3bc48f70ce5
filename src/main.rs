// src/main.rs

mod cli;
mod commands;

use activity_backfill::{AppConfig, db};
use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use commands::RunOptions;
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading config");
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    let mut conn = db::open(&config.database.path).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.database.path.display()
        )
    })?;

    let options = RunOptions {
        keep_going: cli.keep_going,
        dry_run: cli.dry_run,
        quiet: cli.quiet,
    };

    match cli.dataset {
        Some(dataset) => commands::cmd_migrate_dataset(&mut conn, &config, &dataset, options),
        None => {
            commands::cmd_migrate_all(&mut conn, &config, options)?;
            if options.dry_run {
                info!("Dry run, skipping activity_detail cleanup");
                return Ok(());
            }
            commands::cmd_cleanup(&mut conn, cli.yes)
        }
    }
}
