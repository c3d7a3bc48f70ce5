// src/dataset.rs

//! Point-in-time dataset views
//!
//! A `DatasetView` is the transient, read-only representation of a dataset
//! as of one revision. It is never stored on its own; it is embedded in an
//! activity's snapshot payload.

use crate::db::models::TrackingSummary;
use serde::{Deserialize, Serialize};

/// A dataset as it looked at one revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetView {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub license_id: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub maintainer: Option<String>,
    pub maintainer_email: Option<String>,
    pub owner_org: Option<String>,
    pub state: String,
    pub private: bool,
    #[serde(rename = "type")]
    pub dataset_type: String,
    pub metadata_created: Option<String>,
    pub metadata_modified: Option<String>,
    pub revision_id: String,
    pub organization: Option<OrganizationView>,
    pub resources: Vec<ResourceView>,
    pub num_resources: usize,
    pub tags: Vec<TagView>,
    pub num_tags: usize,
    pub extras: Vec<ExtraView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_summary: Option<TrackingSummary>,
}

/// Owning organization, as embedded in a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationView {
    pub id: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub group_type: String,
    pub is_organization: bool,
    pub approval_status: Option<String>,
    pub state: String,
    pub revision_id: String,
    /// Depends on how the view was computed, not on content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: String,
    pub package_id: String,
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub mimetype: Option<String>,
    pub size: Option<i64>,
    pub position: i64,
    pub state: String,
    pub revision_id: String,
    /// Depends on how the view was computed, not on content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub name: String,
    pub display_name: String,
    pub vocabulary_id: Option<String>,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraView {
    pub key: String,
    pub value: Option<String>,
    pub state: String,
}

impl DatasetView {
    /// Look up an extra by key
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.value.as_deref())
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}
