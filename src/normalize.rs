// src/normalize.rs

//! Snapshot normalization
//!
//! Reconstructed views carry a `revision_timestamp` on the organization and
//! on each resource. Its value reflects the reconstruction path rather than
//! the dataset's content, and snapshots saved by the application's normal
//! path never have it, so it is stripped before a view becomes a payload.

use crate::dataset::DatasetView;

/// Remove reconstruction-dependent fields from a view
pub fn normalize(dataset: &mut DatasetView) {
    if let Some(organization) = dataset.organization.as_mut() {
        organization.revision_timestamp = None;
    }

    for resource in &mut dataset.resources {
        resource.revision_timestamp = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{OrganizationView, ResourceView};

    fn resource(id: &str) -> ResourceView {
        ResourceView {
            id: id.to_string(),
            package_id: "pkg-1".to_string(),
            url: format!("http://example.com/{id}.csv"),
            name: None,
            description: None,
            format: Some("CSV".to_string()),
            mimetype: None,
            size: None,
            position: 0,
            state: "active".to_string(),
            revision_id: "rev-1".to_string(),
            revision_timestamp: Some("2018-04-20T16:11:45.363097".to_string()),
        }
    }

    fn view() -> DatasetView {
        DatasetView {
            id: "pkg-1".to_string(),
            name: "census".to_string(),
            title: None,
            notes: None,
            url: None,
            version: None,
            license_id: None,
            author: None,
            author_email: None,
            maintainer: None,
            maintainer_email: None,
            owner_org: Some("org-1".to_string()),
            state: "active".to_string(),
            private: false,
            dataset_type: "dataset".to_string(),
            metadata_created: None,
            metadata_modified: None,
            revision_id: "rev-1".to_string(),
            organization: Some(OrganizationView {
                id: "org-1".to_string(),
                name: "stats-office".to_string(),
                title: None,
                description: None,
                image_url: None,
                group_type: "organization".to_string(),
                is_organization: true,
                approval_status: None,
                state: "active".to_string(),
                revision_id: "rev-1".to_string(),
                revision_timestamp: Some("2018-04-20T16:11:45.363097".to_string()),
            }),
            resources: vec![resource("a"), resource("b")],
            num_resources: 2,
            tags: Vec::new(),
            num_tags: 0,
            extras: Vec::new(),
            tracking_summary: None,
        }
    }

    #[test]
    fn test_strips_organization_and_resource_timestamps() {
        let mut dataset = view();
        normalize(&mut dataset);

        assert!(dataset.organization.as_ref().unwrap().revision_timestamp.is_none());
        assert!(dataset.resources.iter().all(|r| r.revision_timestamp.is_none()));

        let json = serde_json::to_value(&dataset).unwrap();
        assert!(json["organization"].get("revision_timestamp").is_none());
        for res in json["resources"].as_array().unwrap() {
            assert!(res.get("revision_timestamp").is_none());
        }
    }

    #[test]
    fn test_without_organization() {
        let mut dataset = view();
        dataset.organization = None;
        normalize(&mut dataset);
        assert!(dataset.organization.is_none());
        assert_eq!(dataset.resources.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let mut once = view();
        normalize(&mut once);
        let mut twice = once.clone();
        normalize(&mut twice);
        assert_eq!(once, twice);
    }
}
