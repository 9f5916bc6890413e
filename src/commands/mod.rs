use anyhow::{Context, Result};
use log::debug;
use semver::Version;
use std::io::Write;
use tokio_util::sync::CancellationToken;

use crate::{
    metadata::PackageMetadataDocument,
    source::{SearchFilter, SourceRepository},
};

pub mod config;
mod paths;

pub use paths::default_source_root;

/// Search a source and print the matching documents
#[tracing::instrument(skip(source, filter, cancel, out))]
pub async fn search<W: Write>(
    source: &dyn SourceRepository,
    term: &str,
    filter: &SearchFilter,
    skip: usize,
    take: usize,
    cancel: &CancellationToken,
    out: &mut W,
) -> Result<()> {
    let documents = source
        .search(term, filter, skip, take, cancel)
        .await
        .with_context(|| format!("Search of {} failed", source.source()))?;
    debug!("Found {} packages matching '{}'", documents.len(), term);
    print_documents(&documents, out)
}

/// Print the document for one package version
#[tracing::instrument(skip(source, out))]
pub async fn show<W: Write>(
    source: &dyn SourceRepository,
    id: &str,
    version: &Version,
    out: &mut W,
) -> Result<()> {
    let Some(document) = source.get_metadata(id, version).await? else {
        anyhow::bail!("Package {} {} not found", id, version);
    };
    print_json(&document.to_json_ld()?, out)
}

/// Print the documents for every version of a package
#[tracing::instrument(skip(source, out))]
pub async fn versions<W: Write>(source: &dyn SourceRepository, id: &str, out: &mut W) -> Result<()> {
    let documents = source.get_all_metadata_for_id(id).await?;
    debug!("Found {} versions of {}", documents.len(), id);
    print_documents(&documents, out)
}

fn print_documents<W: Write>(documents: &[PackageMetadataDocument], out: &mut W) -> Result<()> {
    let values = documents
        .iter()
        .map(PackageMetadataDocument::to_json_ld)
        .collect::<serde_json::Result<Vec<_>>>()?;
    print_json(&serde_json::Value::Array(values), out)
}

fn print_json<W: Write>(value: &serde_json::Value, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterOptions;
    use crate::package::{NativePackageRecord, PackageSource};
    use crate::repository::MemoryPackageRepository;
    use crate::source::LegacySourceRepository;
    use crate::trace::MemorySink;
    use serde_json::Value;
    use std::sync::Arc;

    fn source() -> LegacySourceRepository {
        let mut records = Vec::new();
        for (id, version) in [("Foo", "1.0.0"), ("Foo", "2.0.0"), ("FooBar", "0.1.0")] {
            let mut record = NativePackageRecord::new(id, Version::parse(version).unwrap());
            record.description = Some(format!("{} package", id));
            records.push(record);
        }
        LegacySourceRepository::new(
            PackageSource::new("memory", "https://feed.example.com"),
            Arc::new(MemoryPackageRepository::new(records)),
            AdapterOptions::default(),
            Arc::new(MemorySink::new()),
        )
    }

    fn output(buf: Vec<u8>) -> Value {
        serde_json::from_slice(&buf).unwrap()
    }

    #[tokio::test]
    async fn test_search_prints_ranked_documents() {
        let mut buf = Vec::new();
        search(
            &source(),
            "foo",
            &SearchFilter::default(),
            0,
            10,
            &CancellationToken::new(),
            &mut buf,
        )
        .await
        .unwrap();

        let value = output(buf);
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["Foo", "Foo", "FooBar"]);
        assert_eq!(value[0]["version"], "2.0.0");
    }

    #[tokio::test]
    async fn test_search_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut buf = Vec::new();
        let err = search(
            &source(),
            "foo",
            &SearchFilter::default(),
            0,
            10,
            &cancel,
            &mut buf,
        )
        .await
        .unwrap_err();

        assert!(format!("{:#}", err).contains("cancelled"));
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_show_prints_document() {
        let mut buf = Vec::new();
        show(&source(), "foo", &Version::new(1, 0, 0), &mut buf)
            .await
            .unwrap();

        let value = output(buf);
        assert_eq!(value["id"], "Foo");
        assert_eq!(value["versions"], serde_json::json!(["1.0.0", "2.0.0"]));
        assert_eq!(value["@id"], "https://feed.example.com/packages/foo/1.0.0");
    }

    #[tokio::test]
    async fn test_show_missing_package() {
        let mut buf = Vec::new();
        let err = show(&source(), "Foo", &Version::new(9, 0, 0), &mut buf)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Package Foo 9.0.0 not found");
    }

    #[tokio::test]
    async fn test_versions_prints_every_version() {
        let mut buf = Vec::new();
        versions(&source(), "Foo", &mut buf).await.unwrap();
        assert_eq!(output(buf).as_array().unwrap().len(), 2);

        let mut buf = Vec::new();
        versions(&source(), "Missing", &mut buf).await.unwrap();
        assert_eq!(output(buf), serde_json::json!([]));
    }
}
