// src/migrate/guard.rs

//! Snapshot payloads and the already-migrated check

use crate::dataset::DatasetView;
use crate::db::models::Activity;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the dataset sub-structure in a payload
pub const DATASET_KEY: &str = "dataset";

/// Key used by payloads written before the snapshot format settled
pub const LEGACY_DATASET_KEY: &str = "package";

/// Payload attached to a migrated activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub dataset: DatasetView,
    pub actor: String,
}

impl SnapshotPayload {
    pub fn new(dataset: DatasetView, actor: impl Into<String>) -> Self {
        Self {
            dataset,
            actor: actor.into(),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// True when the activity already holds a full dataset snapshot
///
/// A payload counts as full once its dataset sub-structure has a non-empty
/// `resources` array. Payloads using the legacy `package` key count too.
pub fn is_fully_migrated(activity: &Activity) -> bool {
    has_full_snapshot(&activity.data)
}

pub(crate) fn has_full_snapshot(data: &Value) -> bool {
    [DATASET_KEY, LEGACY_DATASET_KEY].iter().any(|key| {
        data.get(key)
            .and_then(|dataset| dataset.get("resources"))
            .and_then(Value::as_array)
            .is_some_and(|resources| !resources.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_payload_is_not_migrated() {
        assert!(!has_full_snapshot(&json!({})));
        assert!(!has_full_snapshot(&Value::Null));
    }

    #[test]
    fn test_legacy_shaped_payload_without_resources() {
        let data = json!({"package": {"name": "census", "title": "Census"}, "actor": "alice"});
        assert!(!has_full_snapshot(&data));
    }

    #[test]
    fn test_empty_resources_is_not_migrated() {
        let data = json!({"dataset": {"name": "census", "resources": []}, "actor": "alice"});
        assert!(!has_full_snapshot(&data));
    }

    #[test]
    fn test_populated_resources() {
        let data = json!({"dataset": {"resources": [{"id": "res-1"}]}, "actor": "alice"});
        assert!(has_full_snapshot(&data));

        let legacy = json!({"package": {"resources": [{"id": "res-1"}]}, "actor": "alice"});
        assert!(has_full_snapshot(&legacy));
    }

    #[test]
    fn test_resources_at_top_level_do_not_count() {
        let data = json!({"resources": [{"id": "res-1"}]});
        assert!(!has_full_snapshot(&data));
    }
}
