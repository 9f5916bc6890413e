//! Adapter configuration and user-agent construction.

use std::num::NonZeroUsize;

/// Client name reported in the user agent of source adapters.
pub const CLIENT_NAME: &str = "pkgfeed";

/// Options shared by source repository adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Maximum number of search results projected at the same time.
    pub max_concurrency: usize,
    /// Host application label reported in the user agent.
    pub host: String,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            host: CLIENT_NAME.to_string(),
        }
    }
}

impl AdapterOptions {
    /// Set the projection concurrency. Zero is treated as one.
    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// User agent string for this configuration.
    pub fn user_agent(&self) -> String {
        user_agent(CLIENT_NAME, &self.host)
    }
}

/// Build a user agent of the form `<client>/<version> (<os>; <host>)`.
pub fn user_agent(client: &str, host: &str) -> String {
    format!(
        "{}/{} ({}; {})",
        client,
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        host
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = AdapterOptions::default();
        assert!(options.max_concurrency >= 1);
        assert_eq!(options.host, "pkgfeed");
    }

    #[test]
    fn test_max_concurrency_never_zero() {
        let options = AdapterOptions::default().max_concurrency(0);
        assert_eq!(options.max_concurrency, 1);
        let options = AdapterOptions::default().max_concurrency(8);
        assert_eq!(options.max_concurrency, 8);
    }

    #[test]
    fn test_user_agent_format() {
        let ua = user_agent("pkgfeed", "Shell");
        assert!(ua.starts_with("pkgfeed/"));
        assert!(ua.contains(std::env::consts::OS));
        assert!(ua.ends_with("; Shell)"));
    }

    #[test]
    fn test_options_user_agent_uses_host() {
        let options = AdapterOptions::default().host("Dialog");
        assert!(options.user_agent().ends_with("; Dialog)"));
    }
}
