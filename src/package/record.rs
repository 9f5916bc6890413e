use semver::Version;
use serde::{Deserialize, Serialize};

use super::PackageIdentity;

/// A dependency declared by a package for a target framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDependency {
    pub id: String,
    /// Version range as written by the package author (e.g., "[1.0, 2.0)").
    #[serde(default)]
    pub range: Option<String>,
    /// Target framework the dependency applies to. None = all frameworks.
    #[serde(default)]
    pub framework: Option<String>,
}

/// A package as the underlying store knows it.
///
/// This is the manifest format shared by local directory stores and remote
/// feeds. Only `id` and `version` are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativePackageRecord {
    pub id: String,
    pub version: Version,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub require_license_acceptance: bool,
    #[serde(default)]
    pub download_count: u64,
    /// Publication date (ISO 8601)
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default = "default_listed")]
    pub listed: bool,
    /// Frameworks the package supports. Empty = framework-agnostic.
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<PackageDependency>,
}

fn default_listed() -> bool {
    true
}

impl NativePackageRecord {
    /// Create a minimal record with only an id and version.
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Self {
            id: id.into(),
            version,
            title: None,
            summary: None,
            description: None,
            authors: Vec::new(),
            owners: Vec::new(),
            tags: Vec::new(),
            icon_url: None,
            project_url: None,
            license_url: None,
            require_license_acceptance: false,
            download_count: 0,
            published: None,
            listed: true,
            frameworks: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn identity(&self) -> PackageIdentity {
        PackageIdentity::new(self.id.clone(), self.version.clone())
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// Check whether the package can be consumed by any of the given frameworks.
    ///
    /// An empty framework filter or a framework-agnostic package always matches.
    pub fn supports_any(&self, frameworks: &[String]) -> bool {
        if frameworks.is_empty() || self.frameworks.is_empty() {
            return true;
        }
        self.frameworks
            .iter()
            .any(|fx| frameworks.iter().any(|f| f.eq_ignore_ascii_case(fx)))
    }
}
