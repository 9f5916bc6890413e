//! Projection of native store records into metadata documents.

use semver::Version;

use crate::package::{NativePackageRecord, PackageSource};
use crate::repository::PackageLocation;

use super::{JSON_LD_CONTEXT, PackageMetadataDocument};

/// Build the metadata document for `record`.
///
/// `siblings` are all records known for the same id; their versions become
/// the document's version set. The record's own version is always included,
/// so the set is never empty. With a `location` the document also carries
/// the package's on-disk directory; without one it carries no location at
/// all.
pub fn project(
    record: &NativePackageRecord,
    siblings: &[NativePackageRecord],
    location: Option<&PackageLocation>,
    source: &PackageSource,
) -> PackageMetadataDocument {
    let identity = record.identity();

    let mut versions: Vec<Version> = siblings
        .iter()
        .map(|s| s.version.clone())
        .chain(std::iter::once(record.version.clone()))
        .collect();
    versions.sort();
    versions.dedup();

    let install_path = location.map(|l| l.install_path(&identity));

    PackageMetadataDocument {
        context: JSON_LD_CONTEXT,
        uri: format!(
            "{}/packages/{}/{}",
            source.location.trim_end_matches(['/', '\\']),
            identity.id.to_lowercase(),
            identity.version
        ),
        types: vec!["Package"],
        title: record.title.clone(),
        summary: record.summary.clone(),
        description: record.description.clone(),
        authors: record.authors.clone(),
        owners: record.owners.clone(),
        tags: record.tags.clone(),
        icon_url: record.icon_url.clone(),
        project_url: record.project_url.clone(),
        license_url: record.license_url.clone(),
        require_license_acceptance: record.require_license_acceptance,
        download_count: record.download_count,
        published: record.published.clone(),
        prerelease: record.is_prerelease(),
        frameworks: record.frameworks.clone(),
        dependencies: record.dependencies.clone(),
        versions,
        install_path,
        location: location.cloned(),
        identity,
    }
}
