use anyhow::Result;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    config::AdapterOptions,
    http::HttpClient,
    package::PackageSource,
    repository::{FeedRepository, LegacyRepository, LocalPackageRepository},
    runtime::Runtime,
    source::LegacySourceRepository,
    trace::TraceSink,
};

use super::paths::default_source_root;

/// Everything needed to open a package source from the command line.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub source: PackageSource,
    pub options: AdapterOptions,
}

impl<R: Runtime + 'static> Config<R> {
    /// Resolve the source location and adapter options.
    ///
    /// Without an explicit location the per-user package directory is used.
    pub fn new(runtime: R, location: Option<String>, concurrency: Option<usize>) -> Result<Self> {
        let location = match location {
            Some(location) => location,
            None => default_source_root(&runtime)?.to_string_lossy().into_owned(),
        };

        let mut source = PackageSource::new("local", location);
        if source.is_remote() {
            source.name = "feed".to_string();
        }
        debug!("Using package source {}", source);

        let mut options = AdapterOptions::default();
        if let Some(concurrency) = concurrency {
            options = options.max_concurrency(concurrency);
        }

        Ok(Self {
            runtime,
            source,
            options,
        })
    }

    /// Open the store behind the source.
    ///
    /// Feed stores must be opened inside a tokio runtime.
    pub fn open_repository(self) -> Result<(PackageSource, AdapterOptions, Arc<dyn LegacyRepository>)> {
        let repository: Arc<dyn LegacyRepository> = if self.source.is_remote() {
            let http_client = HttpClient::with_user_agent(&self.options.user_agent())?;
            Arc::new(FeedRepository::new(http_client, &self.source.location)?)
        } else {
            Arc::new(LocalPackageRepository::new(
                self.runtime,
                PathBuf::from(&self.source.location),
            ))
        };
        Ok((self.source, self.options, repository))
    }

    /// Open the source behind an adapter reporting to `trace`.
    pub fn into_source(self, trace: Arc<dyn TraceSink>) -> Result<LegacySourceRepository> {
        let (source, options, repository) = self.open_repository()?;
        Ok(LegacySourceRepository::new(source, repository, options, trace))
    }
}
