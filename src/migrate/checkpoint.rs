// src/migrate/checkpoint.rs

//! Resume point for interrupted full runs
//!
//! The file holds the name of the last dataset a full run finished. Datasets
//! are enumerated in name order, so a later run can skip straight past it.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointState {
    pub last_completed: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<CheckpointState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Index in `datasets` at which a run should start
    pub fn resume_index(&self, datasets: &[String]) -> Result<usize> {
        let Some(state) = self.load()? else {
            return Ok(0);
        };

        match datasets.iter().position(|d| *d == state.last_completed) {
            Some(pos) => {
                debug!(
                    "Resuming after {} ({} datasets already done)",
                    state.last_completed,
                    pos + 1
                );
                Ok(pos + 1)
            }
            None => {
                warn!(
                    "Checkpointed dataset {} no longer exists, starting from the beginning",
                    state.last_completed
                );
                Ok(0)
            }
        }
    }

    /// Record `dataset` as the last one completed
    pub fn record(&self, dataset: &str) -> Result<()> {
        let state = CheckpointState {
            last_completed: dataset.to_string(),
            updated_at: Utc::now(),
        };

        // Write then rename so an interrupted write never leaves a torn file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resume_after_recorded_dataset() {
        let dir = tempdir().unwrap();
        let checkpoint = Checkpoint::new(dir.path().join("checkpoint.json"));
        let datasets = names(&["alpha", "beta", "gamma"]);

        assert_eq!(checkpoint.resume_index(&datasets).unwrap(), 0);

        checkpoint.record("beta").unwrap();
        assert_eq!(checkpoint.resume_index(&datasets).unwrap(), 2);

        checkpoint.clear().unwrap();
        assert!(checkpoint.load().unwrap().is_none());
    }

    #[test]
    fn test_unknown_dataset_restarts() {
        let dir = tempdir().unwrap();
        let checkpoint = Checkpoint::new(dir.path().join("checkpoint.json"));
        checkpoint.record("deleted-dataset").unwrap();

        let datasets = names(&["alpha", "beta"]);
        assert_eq!(checkpoint.resume_index(&datasets).unwrap(), 0);
    }
}
