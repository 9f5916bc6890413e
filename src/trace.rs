//! Instrumentation sink for source repository activity.
//!
//! Every externally observable request made on behalf of a caller is
//! reported here with a stable category tag. Reporting is fire-and-forget:
//! sinks must not fail and must not block for long.

use std::sync::Mutex;

/// Category for outbound free-text searches.
pub const SEARCH: &str = "search";
/// Category for exact id+version lookups.
pub const GET_PACKAGE: &str = "getpackage";
/// Category for all-versions lookups of a single id.
pub const FIND_PACKAGE_BY_ID: &str = "findpackagebyid";
/// Category for the sibling-version lookup made while projecting a search result.
pub const GET_ALL_VERSIONS: &str = "getallvers";
/// Category for outbound HTTP requests reported by the transport.
pub const HTTP: &str = "http";

/// Receiver of (category, message) instrumentation events.
pub trait TraceSink: Send + Sync {
    fn verbose(&self, category: &str, message: &str);
}

/// Default sink that routes events through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingSink {
    source: String,
}

impl TracingSink {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl TraceSink for TracingSink {
    fn verbose(&self, category: &str, message: &str) {
        tracing::debug!(source = %self.source, category, "{}", message);
    }
}

/// Sink that keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<(String, String)> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Recorded events with the given category.
    pub fn messages(&self, category: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(c, _)| c == category)
            .map(|(_, m)| m)
            .collect()
    }
}

impl TraceSink for MemorySink {
    fn verbose(&self, category: &str, message: &str) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push((category.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.verbose(SEARCH, "Searching for 'foo'");
        sink.verbose(HTTP, "GET https://example.com");
        sink.verbose(SEARCH, "Searching for 'bar'");

        assert_eq!(sink.events().len(), 3);
        assert_eq!(
            sink.messages(SEARCH),
            vec!["Searching for 'foo'", "Searching for 'bar'"]
        );
        assert_eq!(sink.messages(HTTP), vec!["GET https://example.com"]);
        assert!(sink.messages(GET_PACKAGE).is_empty());
    }

    #[test_log::test]
    fn test_tracing_sink_does_not_panic() {
        let sink = TracingSink::new("local");
        sink.verbose(GET_PACKAGE, "Getting metadata for Foo 1.0.0");
    }
}
