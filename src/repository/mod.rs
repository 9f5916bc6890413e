//! Legacy package stores.
//!
//! A [`LegacyRepository`] is a synchronous, version-unaware view of a package
//! store: it can enumerate the versions of an id, find an exact version and
//! run a free-text search. Stores optionally expose two capabilities that
//! the source adapter queries once at construction:
//!
//! - [`LegacyRepository::local_location`] for directory-backed stores, giving
//!   the root path and the path resolver used to lay packages out on disk
//! - [`LegacyRepository::request_events`] for stores backed by a transport
//!   that reports its outbound requests
//!
//! # Structure
//!
//! - `path` - Package path resolution for directory stores
//! - `local` - Directory-backed store
//! - `memory` - In-memory store
//! - `feed` - Remote JSON feed store

mod feed;
mod local;
mod memory;
mod path;
mod search;

use anyhow::Result;
use semver::Version;

use crate::http::RequestEvents;
use crate::package::NativePackageRecord;

pub use feed::FeedRepository;
pub use local::LocalPackageRepository;
pub use memory::MemoryPackageRepository;
pub use path::{DefaultPathResolver, PackageLocation, PackagePathResolver};

/// Lazily evaluated search results, in relevance order.
pub type RecordStream = Box<dyn Iterator<Item = NativePackageRecord> + Send>;

pub trait LegacyRepository: Send + Sync {
    /// All versions of a package. Empty if the id is unknown.
    fn find_packages_by_id(&self, id: &str) -> Result<Vec<NativePackageRecord>>;

    /// An exact id+version, if present.
    fn find_package(&self, id: &str, version: &Version) -> Result<Option<NativePackageRecord>>;

    /// Free-text search filtered by frameworks and prerelease status.
    /// Results are ordered by relevance; callers apply pagination.
    fn search(
        &self,
        term: &str,
        frameworks: &[String],
        include_prerelease: bool,
    ) -> Result<RecordStream>;

    /// Root path and path resolver, for stores that live on the file system.
    fn local_location(&self) -> Option<PackageLocation> {
        None
    }

    /// Outbound request notifications, for stores that use a transport.
    fn request_events(&self) -> Option<&dyn RequestEvents> {
        None
    }
}
