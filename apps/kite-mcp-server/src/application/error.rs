//! Dispatch errors.
//!
//! One taxonomy for both the tool path and the resource path. The protocol
//! edge decides how each is rendered: tool calls turn it into an error text
//! result, resource reads into a JSON-RPC error object.

use std::time::Duration;

use thiserror::Error;

use super::ports::BrokerError;
use crate::domain::command::ArgumentError;

/// Failure while dispatching a command or reading a resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The configure round-trip failed.
    #[error("{0}")]
    Configuration(BrokerError),

    /// A data or trading command arrived before a successful configure.
    #[error("Kite Connect not configured. Use {configure_tool} tool first.")]
    NotConfigured {
        /// Name of the configure tool in the active toolset.
        configure_tool: &'static str,
    },

    /// The argument bag does not match the tool schema.
    #[error("{0}")]
    InvalidArguments(#[from] ArgumentError),

    /// The brokerage rejected the call or could not be reached.
    #[error("{0}")]
    Broker(#[from] BrokerError),

    /// Tool name not in the active toolset.
    #[error("Unknown tool: {0}")]
    UnknownCommand(String),

    /// Resource URI not in the active toolset.
    #[error("Unknown resource URI: {0}")]
    UnknownResource(String),

    /// The broker call did not finish within the per-call timeout.
    #[error("{operation} timed out after {secs}s", secs = .after.as_secs())]
    Timeout {
        /// Broker operation name.
        operation: &'static str,
        /// Configured timeout.
        after: Duration,
    },

    /// The worker running the broker call panicked or was aborted.
    #[error("{operation} worker failed: {message}")]
    Worker {
        /// Broker operation name.
        operation: &'static str,
        /// Join error details.
        message: String,
    },
}

impl DispatchError {
    /// Stable snake_case label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::NotConfigured { .. } => "not_configured",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::Broker(_) => "broker",
            Self::UnknownCommand(_) => "unknown_command",
            Self::UnknownResource(_) => "unknown_resource",
            Self::Timeout { .. } => "timeout",
            Self::Worker { .. } => "worker",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broker_message_is_preserved() {
        let err = DispatchError::from(BrokerError::NotFound {
            message: "Order not found".to_string(),
        });
        assert!(err.to_string().contains("Order not found"));
        assert_eq!(err.kind(), "broker");
    }

    #[test]
    fn not_configured_names_the_configure_tool() {
        let err = DispatchError::NotConfigured {
            configure_tool: "configure_kite",
        };
        assert_eq!(
            err.to_string(),
            "Kite Connect not configured. Use configure_kite tool first."
        );
    }

    #[test]
    fn timeout_reports_seconds() {
        let err = DispatchError::Timeout {
            operation: "holdings",
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "holdings timed out after 5s");
    }
}
