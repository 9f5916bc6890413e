//! Package path resolution for directory-backed stores.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::package::PackageIdentity;

/// Maps package identities to names inside a package root.
pub trait PackagePathResolver: Send + Sync {
    /// Directory holding the package, relative to the root.
    fn package_directory(&self, identity: &PackageIdentity) -> String;

    /// Manifest file name inside the package directory.
    fn manifest_file_name(&self, identity: &PackageIdentity) -> String;

    /// Absolute install path of the package under `root`.
    fn install_path(&self, root: &Path, identity: &PackageIdentity) -> PathBuf {
        root.join(self.package_directory(identity))
    }

    /// Absolute manifest path of the package under `root`.
    fn manifest_path(&self, root: &Path, identity: &PackageIdentity) -> PathBuf {
        self.install_path(root, identity)
            .join(self.manifest_file_name(identity))
    }
}

/// `<Id>.<Version>/<Id>.<Version>.json`, or `<Id>/<Id>.json` when
/// side-by-side versions are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPathResolver {
    side_by_side: bool,
}

impl DefaultPathResolver {
    pub fn new(side_by_side: bool) -> Self {
        Self { side_by_side }
    }

    fn base_name(&self, identity: &PackageIdentity) -> String {
        if self.side_by_side {
            format!("{}.{}", identity.id, identity.version)
        } else {
            identity.id.clone()
        }
    }
}

impl Default for DefaultPathResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PackagePathResolver for DefaultPathResolver {
    fn package_directory(&self, identity: &PackageIdentity) -> String {
        self.base_name(identity)
    }

    fn manifest_file_name(&self, identity: &PackageIdentity) -> String {
        format!("{}.json", self.base_name(identity))
    }
}

/// Where a directory store keeps its packages.
#[derive(Clone)]
pub struct PackageLocation {
    root: PathBuf,
    resolver: Arc<dyn PackagePathResolver>,
}

impl PackageLocation {
    pub fn new(root: impl Into<PathBuf>, resolver: Arc<dyn PackagePathResolver>) -> Self {
        Self {
            root: root.into(),
            resolver,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &dyn PackagePathResolver {
        self.resolver.as_ref()
    }

    /// On-disk directory of the given package.
    pub fn install_path(&self, identity: &PackageIdentity) -> PathBuf {
        self.resolver.install_path(&self.root, identity)
    }
}

impl fmt::Debug for PackageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageLocation")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn foo() -> PackageIdentity {
        PackageIdentity::new("Foo", Version::new(1, 2, 0))
    }

    #[test]
    fn test_side_by_side_layout() {
        let resolver = DefaultPathResolver::default();
        assert_eq!(resolver.package_directory(&foo()), "Foo.1.2.0");
        assert_eq!(resolver.manifest_file_name(&foo()), "Foo.1.2.0.json");
        assert_eq!(
            resolver.manifest_path(Path::new("/packages"), &foo()),
            PathBuf::from("/packages/Foo.1.2.0/Foo.1.2.0.json")
        );
    }

    #[test]
    fn test_single_version_layout() {
        let resolver = DefaultPathResolver::new(false);
        assert_eq!(resolver.package_directory(&foo()), "Foo");
        assert_eq!(
            resolver.install_path(Path::new("/packages"), &foo()),
            PathBuf::from("/packages/Foo")
        );
    }

    #[test]
    fn test_location_install_path() {
        let location = PackageLocation::new("/packages", Arc::new(DefaultPathResolver::default()));
        assert_eq!(location.root(), Path::new("/packages"));
        assert_eq!(
            location.install_path(&foo()),
            PathBuf::from("/packages/Foo.1.2.0")
        );
        assert!(format!("{:?}", location).contains("/packages"));
    }
}
