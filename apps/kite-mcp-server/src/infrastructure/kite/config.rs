//! Kite adapter configuration.

use std::time::Duration;

/// Production Kite Connect endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.kite.trade";

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Kite broker adapter.
///
/// Credentials are not part of it; they arrive per session through the
/// configure tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KiteConfig {
    /// REST base URL.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl KiteConfig {
    /// Create a configuration for the production endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the adapter at another base URL (sandbox, mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production() {
        let config = KiteConfig::new();
        assert_eq!(config.base_url, "https://api.kite.trade");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let config = KiteConfig::new()
            .with_base_url("http://127.0.0.1:9000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
