//! Source repository abstraction.
//!
//! A [`SourceRepository`] is the uniform asynchronous contract higher-level
//! tooling uses to query a package source, whatever the store behind it.
//! [`LegacySourceRepository`] implements it on top of a synchronous
//! [`crate::repository::LegacyRepository`].

mod legacy;

use async_trait::async_trait;
use semver::Version;
use std::collections::BTreeSet;
use tokio_util::sync::CancellationToken;

use crate::action::PackageActionType;
use crate::metadata::PackageMetadataDocument;
use crate::package::{PackageIdentity, PackageSource};

pub use legacy::LegacySourceRepository;

/// Restricts search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Frameworks the caller can consume. Empty = any framework.
    pub supported_frameworks: BTreeSet<String>,
    pub include_prerelease: bool,
}

impl SearchFilter {
    pub fn new(include_prerelease: bool) -> Self {
        Self {
            supported_frameworks: BTreeSet::new(),
            include_prerelease,
        }
    }

    pub fn framework(mut self, framework: impl Into<String>) -> Self {
        self.supported_frameworks.insert(framework.into());
        self
    }
}

/// Failures surfaced by source repositories.
///
/// A package that does not exist is not an error: lookups return `None` or
/// an empty list.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The underlying store or its transport failed.
    #[error("Failed to {operation}")]
    Retrieval {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// The caller cancelled the operation.
    #[error("{operation} was cancelled")]
    Cancelled { operation: String },
}

impl SourceError {
    pub fn retrieval(operation: impl Into<String>, source: anyhow::Error) -> Self {
        SourceError::Retrieval {
            operation: operation.into(),
            source,
        }
    }

    pub fn cancelled(operation: impl Into<String>) -> Self {
        SourceError::Cancelled {
            operation: operation.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SourceError::Cancelled { .. })
    }
}

/// Uniform asynchronous access to a package source.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// The endpoint this repository reads from.
    fn source(&self) -> &PackageSource;

    /// Free-text search.
    ///
    /// Results keep the store's relevance order. `skip` and `take` paginate
    /// the store's results before they are turned into documents.
    async fn search(
        &self,
        term: &str,
        filter: &SearchFilter,
        skip: usize,
        take: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageMetadataDocument>, SourceError>;

    /// Metadata for an exact id and version, or `None` if it does not exist.
    async fn get_metadata(
        &self,
        id: &str,
        version: &Version,
    ) -> Result<Option<PackageMetadataDocument>, SourceError>;

    /// Metadata for every version of a package id.
    async fn get_all_metadata_for_id(
        &self,
        id: &str,
    ) -> Result<Vec<PackageMetadataDocument>, SourceError>;

    /// Report a completed package action to the source.
    ///
    /// Must never fail or block.
    fn record_metric(
        &self,
        action_type: PackageActionType,
        package: &PackageIdentity,
        dependent_package: Option<&PackageIdentity>,
        is_update: bool,
        installation_target: Option<&str>,
    );
}
