//! Runtime abstraction for system operations.
//!
//! This module provides a trait-based abstraction over the file system reads
//! performed by directory-backed package stores, enabling dependency
//! injection and testability.

mod fs;

use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn is_dir(&self, path: &Path) -> bool;

    // Directories
    fn data_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn data_dir(&self) -> Option<PathBuf> {
        dirs::data_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_reads() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.json");
        std::fs::write(&file, "{}").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let runtime = RealRuntime;
        assert!(runtime.exists(&file));
        assert!(!runtime.is_dir(&file));
        assert!(runtime.is_dir(&dir.path().join("sub")));
        assert_eq!(runtime.read_to_string(&file).unwrap(), "{}");

        let mut entries = runtime.read_dir(dir.path()).unwrap();
        entries.sort();
        assert_eq!(entries, vec![file, dir.path().join("sub")]);
    }

    #[test]
    fn test_real_runtime_missing_file() {
        let dir = tempdir().unwrap();
        let runtime = RealRuntime;
        let missing = dir.path().join("missing.json");
        assert!(!runtime.exists(&missing));
        assert!(runtime.read_to_string(&missing).is_err());
        assert!(runtime.read_dir(&missing).is_err());
    }
}
