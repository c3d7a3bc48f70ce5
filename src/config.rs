// src/config.rs
//! Backfill configuration loaded from a TOML file
//!
//! ```toml
//! [database]
//! path = "/var/lib/ckan/ckan.db"
//!
//! [activity]
//! site_user = "default"
//! hide_activity_from_users = ["default", "harvest"]
//!
//! [migration]
//! continue_on_error = false
//! checkpoint_file = "/var/lib/ckan/activity-backfill.json"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,

    pub activity: ActivityConfig,

    #[serde(default)]
    pub migration: MigrationConfig,
}

/// Location of the catalogue database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Activity stream settings shared with the running application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Name of the site user that performs automated actions
    pub site_user: String,

    /// Users (by name or id) whose activity is operationally hidden.
    /// Defaults to just the site user.
    #[serde(default)]
    pub hide_activity_from_users: Option<Vec<String>>,
}

impl ActivityConfig {
    /// Names or ids whose activities count as hidden
    pub fn hidden_users(&self) -> Vec<String> {
        match &self.hide_activity_from_users {
            Some(users) => users.clone(),
            None => vec![self.site_user.clone()],
        }
    }
}

/// Behaviour of a migration run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Record a failing dataset and carry on instead of aborting the run
    #[serde(default)]
    pub continue_on_error: bool,

    /// Where a full run records the last completed dataset
    #[serde(default)]
    pub checkpoint_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(Error::ConfigError("database.path must not be empty".to_string()));
        }

        if self.activity.site_user.trim().is_empty() {
            return Err(Error::ConfigError(
                "activity.site_user must not be empty".to_string(),
            ));
        }

        if let Some(users) = &self.activity.hide_activity_from_users
            && users.iter().any(|u| u.trim().is_empty())
        {
            return Err(Error::ConfigError(
                "activity.hide_activity_from_users contains an empty entry".to_string(),
            ));
        }

        Ok(())
    }
}
