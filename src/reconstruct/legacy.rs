// src/reconstruct/legacy.rs

//! Reconstruction from the legacy `*_revision` tables

use super::{RevisionStrategy, ShowRequest};
use crate::dataset::{DatasetView, ExtraView, OrganizationView, ResourceView, TagView};
use crate::db::models::{
    ExtraRevision, GroupRevision, Package, PackageRevision, ResourceRevision, Revision,
    TagRevision, TrackingSummary,
};
use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::debug;

/// Reads each object's version live at the revision's timestamp
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyRevisionStrategy;

impl RevisionStrategy for LegacyRevisionStrategy {
    fn name(&self) -> &'static str {
        "legacy-revision-tables"
    }

    fn package_show(&self, conn: &Connection, request: &ShowRequest<'_>) -> Result<DatasetView> {
        let revision = Revision::find_by_id(conn, request.revision_id)?
            .ok_or_else(|| Error::not_found("Revision", request.revision_id))?;
        let at = revision.timestamp.as_str();

        // Names resolve through the current row; purged datasets only have ids
        let package_id = match Package::find_by_id_or_name(conn, request.dataset_id)? {
            Some(package) => package.id,
            None => request.dataset_id.to_string(),
        };

        let package = PackageRevision::valid_at(conn, &package_id, at)?.ok_or_else(|| {
            Error::not_found(
                "Dataset",
                format!("{} at revision {}", request.dataset_id, request.revision_id),
            )
        })?;

        debug!(
            "Reconstructing {} as of revision {} ({})",
            package.name, revision.id, at
        );

        let organization = match &package.owner_org {
            Some(org_id) => GroupRevision::organization_valid_at(conn, org_id, at)?
                .map(organization_view),
            None => None,
        };

        let resources: Vec<ResourceView> = ResourceRevision::valid_at(conn, &package_id, at)?
            .into_iter()
            .map(resource_view)
            .collect();

        let tags: Vec<TagView> = TagRevision::valid_at(conn, &package_id, at)?
            .into_iter()
            .map(|t| TagView {
                display_name: t.tag_name.clone(),
                name: t.tag_name,
                vocabulary_id: t.vocabulary_id,
                state: t.state,
            })
            .collect();

        let extras = ExtraRevision::valid_at(conn, &package_id, at)?
            .into_iter()
            .map(|e| ExtraView {
                key: e.key,
                value: e.value,
                state: e.state,
            })
            .collect();

        let tracking_summary = if request.include_tracking {
            Some(TrackingSummary::for_package(conn, &package_id)?)
        } else {
            None
        };

        Ok(DatasetView {
            id: package.id,
            name: package.name,
            title: package.title,
            notes: package.notes,
            url: package.url,
            version: package.version,
            license_id: package.license_id,
            author: package.author,
            author_email: package.author_email,
            maintainer: package.maintainer,
            maintainer_email: package.maintainer_email,
            owner_org: package.owner_org,
            state: package.state,
            private: package.private,
            dataset_type: package.package_type,
            metadata_created: package.metadata_created,
            metadata_modified: package.metadata_modified,
            revision_id: package.revision_id,
            organization,
            num_resources: resources.len(),
            resources,
            num_tags: tags.len(),
            tags,
            extras,
            tracking_summary,
        })
    }
}

fn organization_view(group: GroupRevision) -> OrganizationView {
    OrganizationView {
        id: group.id,
        name: group.name,
        title: group.title,
        description: group.description,
        image_url: group.image_url,
        group_type: group.group_type,
        is_organization: group.is_organization,
        approval_status: group.approval_status,
        state: group.state,
        revision_id: group.revision_id,
        revision_timestamp: Some(group.revision_timestamp),
    }
}

fn resource_view(resource: ResourceRevision) -> ResourceView {
    ResourceView {
        id: resource.id,
        package_id: resource.package_id,
        url: resource.url,
        name: resource.name,
        description: resource.description,
        format: resource.format,
        mimetype: resource.mimetype,
        size: resource.size,
        position: resource.position,
        state: resource.state,
        revision_id: resource.revision_id,
        revision_timestamp: Some(resource.revision_timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::reconstruct::Reconstructor;
    use tempfile::tempdir;

    fn seeded() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ckan.db");
        db::init(&path).unwrap();
        let conn = db::open(&path).unwrap();

        Revision::new("rev-1", "2018-01-01T10:00:00").insert(&conn).unwrap();
        Revision::new("rev-2", "2018-03-01T10:00:00").insert(&conn).unwrap();
        Package::new("pkg-1", "census").insert(&conn).unwrap();

        let mut org = GroupRevision::organization("org-1", "rev-1", "stats-office", "2018-01-01T10:00:00");
        org.title = Some("Statistics Office".to_string());
        org.insert(&conn).unwrap();

        let mut v1 = PackageRevision::new("pkg-1", "rev-1", "census", "2018-01-01T10:00:00");
        v1.owner_org = Some("org-1".to_string());
        v1.expired_timestamp = Some("2018-03-01T10:00:00".to_string());
        v1.insert(&conn).unwrap();

        let mut v2 = PackageRevision::new("pkg-1", "rev-2", "census", "2018-03-01T10:00:00");
        v2.owner_org = Some("org-1".to_string());
        v2.title = Some("Census (revised)".to_string());
        v2.insert(&conn).unwrap();

        ResourceRevision::new("res-1", "rev-2", "pkg-1", "http://example.com/a.csv", "2018-03-01T10:00:00")
            .insert(&conn)
            .unwrap();
        TagRevision::new("pt-1", "rev-1", "pkg-1", "population", "2018-01-01T10:00:00")
            .insert(&conn)
            .unwrap();
        ExtraRevision::new("pe-1", "rev-1", "pkg-1", "frequency", "decennial", "2018-01-01T10:00:00")
            .insert(&conn)
            .unwrap();
        TrackingSummary::record(&conn, "pkg-1", "2018-04-01", 3, 42, 7).unwrap();

        (dir, conn)
    }

    #[test]
    fn test_reconstructs_each_revision() {
        let (_dir, conn) = seeded();
        let strategy = LegacyRevisionStrategy;

        let first = strategy
            .package_show(
                &conn,
                &ShowRequest {
                    dataset_id: "pkg-1",
                    revision_id: "rev-1",
                    include_tracking: false,
                },
            )
            .unwrap();
        assert_eq!(first.title, None);
        assert!(first.resources.is_empty());
        assert_eq!(first.tag_names(), vec!["population"]);
        assert_eq!(first.extra("frequency"), Some("decennial"));
        assert_eq!(first.organization.as_ref().unwrap().name, "stats-office");
        assert!(first.tracking_summary.is_none());

        let second = strategy
            .package_show(
                &conn,
                &ShowRequest {
                    dataset_id: "census",
                    revision_id: "rev-2",
                    include_tracking: false,
                },
            )
            .unwrap();
        assert_eq!(second.title.as_deref(), Some("Census (revised)"));
        assert_eq!(second.num_resources, 1);
        assert_eq!(
            second.resources[0].revision_timestamp.as_deref(),
            Some("2018-03-01T10:00:00")
        );
    }

    #[test]
    fn test_tracking_only_when_requested() {
        let (_dir, conn) = seeded();
        let view = LegacyRevisionStrategy
            .package_show(
                &conn,
                &ShowRequest {
                    dataset_id: "pkg-1",
                    revision_id: "rev-2",
                    include_tracking: true,
                },
            )
            .unwrap();
        assert_eq!(
            view.tracking_summary,
            Some(TrackingSummary { total: 42, recent: 7 })
        );
    }

    #[test]
    fn test_reconstructor_never_attaches_tracking() {
        let (_dir, conn) = seeded();
        let reconstructor = Reconstructor::legacy();
        assert_eq!(reconstructor.strategy_name(), "legacy-revision-tables");

        let view = reconstructor.reconstruct(&conn, "pkg-1", "rev-2").unwrap();
        assert!(view.tracking_summary.is_none());
    }

    #[test]
    fn test_unknown_revision_is_not_found() {
        let (_dir, conn) = seeded();
        let err = Reconstructor::legacy()
            .reconstruct(&conn, "pkg-1", "rev-missing")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_dataset_absent_at_revision_is_not_found() {
        let (_dir, conn) = seeded();
        let err = Reconstructor::legacy()
            .reconstruct(&conn, "pkg-unknown", "rev-1")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "Dataset", .. }));
    }
}
