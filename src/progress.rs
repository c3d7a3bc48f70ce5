// src/progress.rs

//! Progress reporting for migration runs
//!
//! A long backfill has to be observable: every dataset and every activity
//! is announced, along with skips and commits. The `MigrationReporter`
//! trait decouples the walker from where those notices go.
//!
//! Implementations:
//! - `ConsoleReporter`: indented lines under an indicatif dataset bar
//! - `LogReporter`: the same notices through tracing
//! - `SilentReporter`: no-op for scripted use
//! - `CallbackReporter`: hands each event to a closure

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use tracing::{info, warn};

/// Something worth telling the operator about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationEvent {
    /// Starting dataset `index` of `total` (1-based)
    DatasetStarted {
        index: usize,
        total: usize,
        dataset: String,
    },
    /// Skipped because a previous run already got past it
    DatasetResumed { dataset: String },
    /// The dataset has no activities at all
    NoActivities { dataset: String },
    /// Processing activity `index` of `total` (1-based)
    ActivityStarted {
        index: usize,
        total: usize,
        timestamp: String,
    },
    /// The activity already holds a full snapshot
    AlreadyRecorded { activity_id: String },
    /// The dataset's unit of work was committed
    Saved { dataset: String, payloads: usize },
    /// Dry run: payloads that would have been written
    WouldSave { dataset: String, payloads: usize },
    /// Final per-dataset line
    DatasetFinished { dataset: String, activities: usize },
    /// The dataset failed and the run carries on
    DatasetFailed { dataset: String, error: String },
}

impl fmt::Display for MigrationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationEvent::DatasetStarted {
                index,
                total,
                dataset,
            } => write!(f, "{index}/{total} {dataset}"),
            MigrationEvent::DatasetResumed { dataset } => {
                write!(f, "  {dataset} done in an earlier run - skipping")
            }
            MigrationEvent::NoActivities { dataset } => write!(f, "  No activities for {dataset}"),
            MigrationEvent::ActivityStarted {
                index,
                total,
                timestamp,
            } => write!(f, "  activity {index}/{total} {timestamp}"),
            MigrationEvent::AlreadyRecorded { .. } => {
                write!(f, "    Full dataset already recorded - no action")
            }
            MigrationEvent::Saved { payloads, .. } => write!(f, "  saved ({payloads} updated)"),
            MigrationEvent::WouldSave { payloads, .. } => {
                write!(f, "  dry run - {payloads} would be updated")
            }
            MigrationEvent::DatasetFinished {
                dataset,
                activities,
            } => write!(f, "  {dataset}: all {activities} activities migrated"),
            MigrationEvent::DatasetFailed { dataset, error } => {
                write!(f, "  FAILED {dataset}: {error}")
            }
        }
    }
}

/// Receives migration events
pub trait MigrationReporter {
    fn report(&self, event: &MigrationEvent);
}

/// Writes each event as a line, with an overall bar across datasets
///
/// The bar stays hidden until the first `DatasetStarted`, so migrating a
/// single dataset prints plain lines on stdout.
pub struct ConsoleReporter {
    bar: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} ({pos}/{len}) [{bar:40.green/dim}] {percent}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        Self { bar }
    }

    /// Datasets completed so far, skipped and failed ones included
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn line(&self, event: &MigrationEvent) {
        if self.bar.is_hidden() {
            println!("{event}");
        } else {
            self.bar.println(event.to_string());
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationReporter for ConsoleReporter {
    fn report(&self, event: &MigrationEvent) {
        if let MigrationEvent::DatasetStarted {
            index,
            total,
            dataset,
        } = event
        {
            if self.bar.length() != Some(*total as u64) {
                self.bar.set_length(*total as u64);
                self.bar.set_draw_target(ProgressDrawTarget::stderr());
            }
            self.bar.set_position(index.saturating_sub(1) as u64);
            self.bar.set_message(dataset.clone());
        }

        self.line(event);

        if matches!(
            event,
            MigrationEvent::DatasetResumed { .. }
                | MigrationEvent::NoActivities { .. }
                | MigrationEvent::DatasetFinished { .. }
                | MigrationEvent::DatasetFailed { .. }
        ) {
            self.bar.inc(1);
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Logs each event through tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl MigrationReporter for LogReporter {
    fn report(&self, event: &MigrationEvent) {
        match event {
            MigrationEvent::DatasetFailed { .. } => warn!("{}", event.to_string().trim_start()),
            _ => info!("{}", event.to_string().trim_start()),
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl MigrationReporter for SilentReporter {
    fn report(&self, _event: &MigrationEvent) {}
}

/// Calls a closure for each event
pub struct CallbackReporter<F>
where
    F: Fn(&MigrationEvent),
{
    callback: F,
}

impl<F> CallbackReporter<F>
where
    F: Fn(&MigrationEvent),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> MigrationReporter for CallbackReporter<F>
where
    F: Fn(&MigrationEvent),
{
    fn report(&self, event: &MigrationEvent) {
        (self.callback)(event);
    }
}
