//! Free-text matching and relevance ranking shared by in-process stores.

use std::cmp::Ordering;

use crate::package::NativePackageRecord;

use super::RecordStream;

/// How well a record matches a search term. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Relevance {
    ExactId,
    IdPrefix,
    Other,
}

fn relevance(record: &NativePackageRecord, term: &str) -> Option<Relevance> {
    if term.is_empty() {
        return Some(Relevance::Other);
    }
    let id = record.id.to_lowercase();
    if id == term {
        return Some(Relevance::ExactId);
    }
    if id.starts_with(term) {
        return Some(Relevance::IdPrefix);
    }

    let in_text = |text: &Option<String>| {
        text.as_deref()
            .is_some_and(|t| t.to_lowercase().contains(term))
    };
    if id.contains(term)
        || in_text(&record.title)
        || in_text(&record.summary)
        || in_text(&record.description)
        || record.tags.iter().any(|t| t.to_lowercase().contains(term))
    {
        Some(Relevance::Other)
    } else {
        None
    }
}

fn compare(a: &(Relevance, NativePackageRecord), b: &(Relevance, NativePackageRecord)) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| b.1.download_count.cmp(&a.1.download_count))
        .then_with(|| a.1.id.to_lowercase().cmp(&b.1.id.to_lowercase()))
        .then_with(|| b.1.version.cmp(&a.1.version))
}

/// Filter and rank `records` for a search.
///
/// Unlisted packages never match. Prereleases match only when requested.
/// Results come back most relevant first.
pub(crate) fn search_records(
    records: impl IntoIterator<Item = NativePackageRecord>,
    term: &str,
    frameworks: &[String],
    include_prerelease: bool,
) -> RecordStream {
    let term = term.trim().to_lowercase();
    let mut ranked: Vec<(Relevance, NativePackageRecord)> = records
        .into_iter()
        .filter(|r| r.listed)
        .filter(|r| include_prerelease || !r.is_prerelease())
        .filter(|r| r.supports_any(frameworks))
        .filter_map(|r| relevance(&r, &term).map(|rel| (rel, r)))
        .collect();
    ranked.sort_by(compare);
    Box::new(ranked.into_iter().map(|(_, record)| record))
}
