//! Canonical package metadata documents.
//!
//! Whatever the shape of the underlying store, the source adapter hands out
//! [`PackageMetadataDocument`]s: a JSON-LD description of one package
//! version, carrying every version known for the package id and, for
//! directory stores, where the package lives on disk.

mod projector;

use semver::Version;
use serde::Serialize;
use std::path::PathBuf;

use crate::package::{PackageDependency, PackageIdentity};
use crate::repository::PackageLocation;

pub use projector::project;

/// JSON-LD vocabulary the documents are expressed in.
pub const JSON_LD_CONTEXT: &str = "https://schema.pkgfeed.dev/package#";

/// Canonical metadata for one package version.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadataDocument {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub uri: String,
    #[serde(rename = "@type")]
    pub types: Vec<&'static str>,
    #[serde(flatten)]
    pub identity: PackageIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub owners: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
    pub require_license_acceptance: bool,
    pub download_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    pub prerelease: bool,
    pub frameworks: Vec<String>,
    pub dependencies: Vec<PackageDependency>,
    /// Every version known for this id, ascending. Never empty.
    pub versions: Vec<Version>,
    /// On-disk directory, for packages from directory stores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_path: Option<PathBuf>,
    #[serde(skip)]
    pub location: Option<PackageLocation>,
}

impl PackageMetadataDocument {
    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn version(&self) -> &Version {
        &self.identity.version
    }

    pub fn has_version(&self, version: &Version) -> bool {
        self.versions.contains(version)
    }

    /// Render the document as a JSON-LD value.
    ///
    /// Fails only if the install path is not valid UTF-8.
    pub fn to_json_ld(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
