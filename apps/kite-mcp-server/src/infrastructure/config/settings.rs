//! Server Configuration Settings
//!
//! Loaded from environment variables, optionally seeded from a `.env` file by
//! the binary. Kite credentials are deliberately absent: they only arrive
//! through the configure tool.

use std::time::Duration;

use crate::application::services::{DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_CONCURRENT_CALLS};
use crate::domain::toolset::Toolset;
use crate::infrastructure::kite::KiteConfig;

/// Broker call executor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Maximum broker calls in flight.
    pub max_concurrent_calls: usize,
    /// Per-call timeout.
    pub call_timeout: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerConfig {
    /// Published tool surface.
    pub toolset: Toolset,
    /// Kite REST adapter settings.
    pub kite: KiteConfig,
    /// Broker call executor settings.
    pub executor: ExecutorSettings,
    /// Prometheus metrics port (0 = disabled).
    pub metrics_port: u16,
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `KITE_MCP_TOOLSET` names an unknown toolset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    ///
    /// Unparseable numeric values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `KITE_MCP_TOOLSET` names an unknown toolset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let toolset = match lookup("KITE_MCP_TOOLSET").filter(|v| !v.trim().is_empty()) {
            Some(name) => Toolset::parse(&name).ok_or(ConfigError::UnknownToolset(name))?,
            None => Toolset::default(),
        };

        let defaults = KiteConfig::default();
        let kite = KiteConfig {
            base_url: lookup("KITE_API_BASE_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            timeout: parse_duration_secs(&lookup, "KITE_HTTP_TIMEOUT_SECS", defaults.timeout),
        };

        let executor = ExecutorSettings {
            max_concurrent_calls: parse(
                &lookup,
                "KITE_MCP_MAX_CONCURRENT_CALLS",
                DEFAULT_MAX_CONCURRENT_CALLS,
            )
            .max(1),
            call_timeout: parse_duration_secs(&lookup, "KITE_MCP_CALL_TIMEOUT_SECS", DEFAULT_CALL_TIMEOUT),
        };

        Ok(Self {
            toolset,
            kite,
            executor,
            metrics_port: parse(&lookup, "KITE_MCP_METRICS_PORT", 0),
        })
    }

    /// Whether the Prometheus listener should be started.
    #[must_use]
    pub const fn metrics_enabled(&self) -> bool {
        self.metrics_port != 0
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `KITE_MCP_TOOLSET` is not `full` or `compact`.
    #[error("unknown toolset '{0}' in KITE_MCP_TOOLSET (expected 'full' or 'compact')")]
    UnknownToolset(String),
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_duration_secs<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(default, Duration::from_secs)
}
