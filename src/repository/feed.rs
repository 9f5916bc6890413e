//! Remote JSON feed store.
//!
//! The feed exposes three endpoints, all returning package manifests in the
//! same JSON shape as directory stores:
//!
//! - `GET {base}/packages/{id}` - every version of a package
//! - `GET {base}/packages/{id}/{version}` - one exact version
//! - `GET {base}/search?q=..&prerelease=..&framework=..` - ranked results
//!
//! The store is synchronous like every [`LegacyRepository`]: requests are
//! driven to completion on the tokio runtime captured at construction, so
//! calls must come from a blocking context (e.g. `spawn_blocking`).

use anyhow::{Context, Result, anyhow};
use log::debug;
use reqwest::Url;
use semver::Version;
use tokio::runtime::Handle;

use crate::http::{HttpClient, RequestEvents};
use crate::package::NativePackageRecord;

use super::{LegacyRepository, RecordStream};

pub struct FeedRepository {
    http_client: HttpClient,
    base_url: Url,
    handle: Handle,
}

impl FeedRepository {
    /// Create a feed store bound to the current tokio runtime.
    pub fn new(http_client: HttpClient, base_url: &str) -> Result<Self> {
        let handle = Handle::try_current()
            .context("Feed repositories must be created inside a tokio runtime")?;
        Self::with_handle(http_client, base_url, handle)
    }

    pub fn with_handle(http_client: HttpClient, base_url: &str, handle: Handle) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid feed URL '{}'", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Feed URL '{}' cannot have a path", base_url);
        }
        Ok(Self {
            http_client,
            base_url,
            handle,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended with `segments`, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Feed URL '{}' cannot have a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl LegacyRepository for FeedRepository {
    fn find_packages_by_id(&self, id: &str) -> Result<Vec<NativePackageRecord>> {
        let url = self.endpoint(&["packages", id])?;
        debug!("Fetching all versions of {} from {}...", id, url);
        let records: Option<Vec<NativePackageRecord>> = self
            .handle
            .block_on(self.http_client.get_json_optional(url.as_str(), &[]))
            .with_context(|| format!("Failed to fetch versions of {}", id))?;
        Ok(records.unwrap_or_default())
    }

    fn find_package(&self, id: &str, version: &Version) -> Result<Option<NativePackageRecord>> {
        let version_segment = version.to_string();
        let url = self.endpoint(&["packages", id, &version_segment])?;
        debug!("Fetching {} {} from {}...", id, version, url);
        self.handle
            .block_on(self.http_client.get_json_optional(url.as_str(), &[]))
            .with_context(|| format!("Failed to fetch {} {}", id, version))
    }

    fn search(
        &self,
        term: &str,
        frameworks: &[String],
        include_prerelease: bool,
    ) -> Result<RecordStream> {
        let url = self.endpoint(&["search"])?;
        let prerelease = include_prerelease.to_string();
        let mut query: Vec<(&str, &str)> = vec![("q", term), ("prerelease", prerelease.as_str())];
        query.extend(frameworks.iter().map(|fx| ("framework", fx.as_str())));

        let records: Vec<NativePackageRecord> = self
            .handle
            .block_on(self.http_client.get_json(url.as_str(), &query))
            .with_context(|| format!("Failed to search {} for '{}'", self.base_url, term))?;
        Ok(Box::new(records.into_iter()))
    }

    fn request_events(&self) -> Option<&dyn RequestEvents> {
        Some(&self.http_client)
    }
}
