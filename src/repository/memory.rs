//! In-memory package store.

use anyhow::Result;
use semver::Version;

use crate::package::NativePackageRecord;

use super::search::search_records;
use super::{LegacyRepository, RecordStream};

/// A store holding its records in memory.
///
/// Useful for embedding fixed package sets and as a fixture in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackageRepository {
    records: Vec<NativePackageRecord>,
}

impl MemoryPackageRepository {
    pub fn new(records: Vec<NativePackageRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LegacyRepository for MemoryPackageRepository {
    fn find_packages_by_id(&self, id: &str) -> Result<Vec<NativePackageRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.id.eq_ignore_ascii_case(id))
            .cloned()
            .collect())
    }

    fn find_package(&self, id: &str, version: &Version) -> Result<Option<NativePackageRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(id) && &r.version == version)
            .cloned())
    }

    fn search(
        &self,
        term: &str,
        frameworks: &[String],
        include_prerelease: bool,
    ) -> Result<RecordStream> {
        Ok(search_records(
            self.records.clone(),
            term,
            frameworks,
            include_prerelease,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MemoryPackageRepository {
        MemoryPackageRepository::new(vec![
            NativePackageRecord::new("Foo", Version::new(1, 0, 0)),
            NativePackageRecord::new("Foo", Version::new(2, 0, 0)),
            NativePackageRecord::new("Bar", Version::new(1, 0, 0)),
        ])
    }

    #[test]
    fn test_find_packages_by_id_ignores_case() {
        let versions = repo().find_packages_by_id("foo").unwrap();
        assert_eq!(versions.len(), 2);
        assert!(repo().find_packages_by_id("Missing").unwrap().is_empty());
    }

    #[test]
    fn test_find_package() {
        let found = repo().find_package("Foo", &Version::new(2, 0, 0)).unwrap();
        assert_eq!(found.unwrap().version, Version::new(2, 0, 0));
        assert!(
            repo()
                .find_package("Foo", &Version::new(3, 0, 0))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_search_and_capabilities() {
        let repo = repo();
        let results: Vec<_> = repo.search("bar", &[], false).unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(repo.local_location().is_none());
        assert!(repo.request_events().is_none());
        assert_eq!(repo.len(), 3);
    }
}
