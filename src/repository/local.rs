//! Directory-backed package store.
//!
//! Each package lives in its own directory under the store root, named by the
//! store's [`PackagePathResolver`], with a JSON manifest inside:
//!
//! ```text
//! <root>/
//!   Foo.1.0.0/Foo.1.0.0.json
//!   Foo.2.0.0/Foo.2.0.0.json
//! ```

use anyhow::{Context, Result};
use log::{debug, warn};
use semver::Version;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::package::{NativePackageRecord, PackageIdentity};
use crate::runtime::Runtime;

use super::path::{DefaultPathResolver, PackageLocation, PackagePathResolver};
use super::search::search_records;
use super::{LegacyRepository, RecordStream};

/// Package store rooted in a local directory.
pub struct LocalPackageRepository<R: Runtime> {
    runtime: R,
    root: PathBuf,
    resolver: Arc<dyn PackagePathResolver>,
}

impl<R: Runtime> LocalPackageRepository<R> {
    /// Create a store using the default side-by-side layout.
    pub fn new(runtime: R, root: impl Into<PathBuf>) -> Self {
        Self::with_resolver(runtime, root, Arc::new(DefaultPathResolver::default()))
    }

    pub fn with_resolver(
        runtime: R,
        root: impl Into<PathBuf>,
        resolver: Arc<dyn PackagePathResolver>,
    ) -> Self {
        Self {
            runtime,
            root: root.into(),
            resolver,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Package directories whose name could belong to `id`.
    ///
    /// When `id` is None every directory is returned.
    fn package_dirs(&self, id: Option<&str>) -> Result<Vec<PathBuf>> {
        if !self.runtime.exists(&self.root) {
            debug!("Package root {:?} does not exist", self.root);
            return Ok(vec![]);
        }

        let prefix = id.map(|id| id.to_lowercase());
        let mut dirs = Vec::new();
        for entry in self
            .runtime
            .read_dir(&self.root)
            .with_context(|| format!("Failed to list packages in {:?}", self.root))?
        {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let name = name.to_lowercase();
            let candidate = match &prefix {
                Some(p) => name == *p || name.starts_with(&format!("{}.", p)),
                None => true,
            };
            if candidate && self.runtime.is_dir(&entry) {
                dirs.push(entry);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Load every manifest found in a package directory.
    fn load_dir(&self, dir: &Path) -> Result<Vec<NativePackageRecord>> {
        let mut records = Vec::new();
        let mut files = self.runtime.read_dir(dir)?;
        files.sort();
        for file in files {
            if file.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = self.load_manifest(&file) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Parse a manifest, skipping it with a warning if it is unreadable.
    fn load_manifest(&self, path: &Path) -> Option<NativePackageRecord> {
        let parsed = self
            .runtime
            .read_to_string(path)
            .and_then(|content| {
                serde_json::from_str::<NativePackageRecord>(&content)
                    .with_context(|| format!("Invalid package manifest {:?}", path))
            });
        match parsed {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping package manifest {:?}: {:#}", path, e);
                None
            }
        }
    }

    fn load_all(&self, id: Option<&str>) -> Result<Vec<NativePackageRecord>> {
        let mut records = Vec::new();
        for dir in self.package_dirs(id)? {
            records.extend(self.load_dir(&dir)?);
        }
        if let Some(id) = id {
            records.retain(|r| r.id.eq_ignore_ascii_case(id));
        }
        Ok(records)
    }
}

impl<R: Runtime> LegacyRepository for LocalPackageRepository<R> {
    #[tracing::instrument(skip(self))]
    fn find_packages_by_id(&self, id: &str) -> Result<Vec<NativePackageRecord>> {
        let mut records = self.load_all(Some(id))?;
        records.sort_by(|a, b| a.version.cmp(&b.version));
        records.dedup_by(|a, b| a.version == b.version);
        Ok(records)
    }

    #[tracing::instrument(skip(self))]
    fn find_package(&self, id: &str, version: &Version) -> Result<Option<NativePackageRecord>> {
        let identity = PackageIdentity::new(id, version.clone());
        let manifest = self.resolver.manifest_path(&self.root, &identity);
        if self.runtime.exists(&manifest)
            && let Some(record) = self.load_manifest(&manifest)
            && record.id.eq_ignore_ascii_case(id)
            && &record.version == version
        {
            return Ok(Some(record));
        }

        // Directory names may differ in case or version formatting
        Ok(self
            .find_packages_by_id(id)?
            .into_iter()
            .find(|r| &r.version == version))
    }

    #[tracing::instrument(skip(self))]
    fn search(
        &self,
        term: &str,
        frameworks: &[String],
        include_prerelease: bool,
    ) -> Result<RecordStream> {
        let records = self.load_all(None)?;
        Ok(search_records(records, term, frameworks, include_prerelease))
    }

    fn local_location(&self) -> Option<PackageLocation> {
        Some(PackageLocation::new(self.root.clone(), self.resolver.clone()))
    }
}
