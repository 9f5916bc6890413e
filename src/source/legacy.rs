//! Source repository backed by a synchronous legacy store.

use anyhow::Result;
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use log::debug;
use semver::Version;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::action::PackageActionType;
use crate::config::AdapterOptions;
use crate::http::OutboundRequest;
use crate::metadata::{PackageMetadataDocument, project};
use crate::package::{NativePackageRecord, PackageIdentity, PackageSource};
use crate::repository::{LegacyRepository, PackageLocation};
use crate::trace::{self, TraceSink};

use super::{SearchFilter, SourceError, SourceRepository};

/// Adapts a [`LegacyRepository`] to the [`SourceRepository`] contract.
///
/// Store calls are synchronous, so they run on tokio's blocking pool. The
/// store's capabilities are looked up once here: a directory store's
/// location is kept for projection, and a transport's request events are
/// forwarded to the trace sink for the lifetime of the store.
pub struct LegacySourceRepository {
    source: PackageSource,
    repository: Arc<dyn LegacyRepository>,
    location: Option<PackageLocation>,
    user_agent: String,
    options: AdapterOptions,
    trace: Arc<dyn TraceSink>,
}

impl LegacySourceRepository {
    pub fn new(
        source: PackageSource,
        repository: Arc<dyn LegacyRepository>,
        options: AdapterOptions,
        trace: Arc<dyn TraceSink>,
    ) -> Self {
        let user_agent = options.user_agent();

        if let Some(events) = repository.request_events() {
            let sink = trace.clone();
            events.on_sending_request(Arc::new(move |request: &OutboundRequest| {
                sink.verbose(
                    trace::HTTP,
                    &format!("{} {}", request.method, request.url),
                );
            }));
        }

        let location = repository.local_location();
        debug!(
            "Created source repository for {} (local: {})",
            source,
            location.is_some()
        );

        Self {
            source,
            repository,
            location,
            user_agent,
            options,
            trace,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn location(&self) -> Option<&PackageLocation> {
        self.location.as_ref()
    }

    fn project(
        &self,
        record: &NativePackageRecord,
        siblings: &[NativePackageRecord],
    ) -> PackageMetadataDocument {
        project(record, siblings, self.location.as_ref(), &self.source)
    }

    /// Project one search hit, looking up all versions of its id.
    async fn project_search_result(
        &self,
        record: NativePackageRecord,
    ) -> Result<PackageMetadataDocument, SourceError> {
        self.trace.verbose(
            trace::GET_ALL_VERSIONS,
            &format!("Retrieving all versions for {}", record.id),
        );

        let id = record.id.clone();
        let siblings = run_blocking(&self.repository, move |repo| repo.find_packages_by_id(&id))
            .await
            .map_err(|e| {
                SourceError::retrieval(format!("retrieve all versions of {}", record.id), e)
            })?;

        Ok(self.project(&record, &siblings))
    }
}

/// Run a store call on the blocking pool.
async fn run_blocking<T, F>(repository: &Arc<dyn LegacyRepository>, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn LegacyRepository) -> Result<T> + Send + 'static,
{
    let repository = repository.clone();
    tokio::task::spawn_blocking(move || call(repository.as_ref())).await?
}

#[async_trait]
impl SourceRepository for LegacySourceRepository {
    fn source(&self) -> &PackageSource {
        &self.source
    }

    async fn search(
        &self,
        term: &str,
        filter: &SearchFilter,
        skip: usize,
        take: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageMetadataDocument>, SourceError> {
        self.trace
            .verbose(trace::SEARCH, &format!("Searching for '{}'", term));
        let operation = format!("search {} for '{}'", self.source.name, term);

        if cancel.is_cancelled() {
            return Err(SourceError::cancelled(operation));
        }
        if take == 0 {
            return Ok(vec![]);
        }

        let search_term = term.to_string();
        let frameworks: Vec<String> = filter.supported_frameworks.iter().cloned().collect();
        let include_prerelease = filter.include_prerelease;
        let page = run_blocking(&self.repository, move |repo| {
            Ok(repo
                .search(&search_term, &frameworks, include_prerelease)?
                .skip(skip)
                .take(take)
                .collect::<Vec<_>>())
        });

        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SourceError::cancelled(operation.clone())),
            page = page => page.map_err(|e| SourceError::retrieval(operation.clone(), e))?,
        };
        debug!("Projecting {} search results for '{}'", records.len(), term);

        // Ordered buffering keeps relevance order while projecting in parallel
        let projections = stream::iter(records)
            .map(|record| self.project_search_result(record))
            .buffered(self.options.max_concurrency.max(1))
            .try_collect::<Vec<_>>();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SourceError::cancelled(operation)),
            documents = projections => documents,
        }
    }

    async fn get_metadata(
        &self,
        id: &str,
        version: &Version,
    ) -> Result<Option<PackageMetadataDocument>, SourceError> {
        self.trace.verbose(
            trace::GET_PACKAGE,
            &format!("Getting metadata for {} {}", id, version),
        );

        let lookup_id = id.to_string();
        let lookup_version = version.clone();
        let found = run_blocking(&self.repository, move |repo| {
            let Some(record) = repo.find_package(&lookup_id, &lookup_version)? else {
                return Ok(None);
            };
            let siblings = repo.find_packages_by_id(&record.id)?;
            Ok(Some((record, siblings)))
        })
        .await
        .map_err(|e| SourceError::retrieval(format!("get metadata for {} {}", id, version), e))?;

        Ok(found.map(|(record, siblings)| self.project(&record, &siblings)))
    }

    async fn get_all_metadata_for_id(
        &self,
        id: &str,
    ) -> Result<Vec<PackageMetadataDocument>, SourceError> {
        self.trace.verbose(
            trace::FIND_PACKAGE_BY_ID,
            &format!("Getting metadata for all versions of {}", id),
        );

        let lookup_id = id.to_string();
        let records = run_blocking(&self.repository, move |repo| {
            repo.find_packages_by_id(&lookup_id)
        })
        .await
        .map_err(|e| SourceError::retrieval(format!("get metadata for all versions of {}", id), e))?;

        Ok(records
            .iter()
            .map(|record| self.project(record, &records))
            .collect())
    }

    fn record_metric(
        &self,
        _action_type: PackageActionType,
        _package: &PackageIdentity,
        _dependent_package: Option<&PackageIdentity>,
        _is_update: bool,
        _installation_target: Option<&str>,
    ) {
        // Legacy stores have no telemetry channel
    }
}
