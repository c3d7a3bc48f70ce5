// src/reconstruct/mod.rs

//! Revision-aware dataset reconstruction
//!
//! The catalogue's normal dataset retrieval no longer understands revision
//! markers, so reconstruction goes through a `RevisionStrategy` chosen once
//! at startup and handed to the `Reconstructor`. The strategy is the only
//! piece that knows how historical state is stored.

mod legacy;

pub use legacy::LegacyRevisionStrategy;

use crate::dataset::DatasetView;
use crate::error::Result;
use rusqlite::Connection;
use tracing::debug;

/// Parameters of one historical dataset lookup
#[derive(Debug, Clone, Copy)]
pub struct ShowRequest<'a> {
    /// Dataset id (or name)
    pub dataset_id: &'a str,
    /// Revision marker taken from the activity
    pub revision_id: &'a str,
    /// Attach page view counters to the view
    pub include_tracking: bool,
}

/// A way of rebuilding a dataset as of a revision
pub trait RevisionStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Rebuild the dataset named by `request`
    ///
    /// Fails with `Error::NotFound` when the revision marker is unknown or
    /// the dataset did not exist at that revision.
    fn package_show(&self, conn: &Connection, request: &ShowRequest<'_>) -> Result<DatasetView>;
}

/// Dataset retrieval with a revision strategy installed
pub struct Reconstructor {
    strategy: Box<dyn RevisionStrategy>,
}

impl Reconstructor {
    /// Install `strategy` for the lifetime of this reconstructor
    pub fn new(strategy: impl RevisionStrategy + 'static) -> Self {
        debug!("Installing revision strategy: {}", strategy.name());
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Reconstructor backed by the legacy revision tables
    pub fn legacy() -> Self {
        Self::new(LegacyRevisionStrategy)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// The dataset as of `revision_id`, without tracking counters
    pub fn reconstruct(
        &self,
        conn: &Connection,
        dataset_id: &str,
        revision_id: &str,
    ) -> Result<DatasetView> {
        self.strategy.package_show(
            conn,
            &ShowRequest {
                dataset_id,
                revision_id,
                include_tracking: false,
            },
        )
    }
}

impl std::fmt::Debug for Reconstructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconstructor")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
