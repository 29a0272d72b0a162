//! Prometheus Metrics Module
//!
//! # Metrics Categories
//!
//! - **Tool calls**: invocations by tool and outcome, with latency
//! - **Resource reads**: reads by URI and outcome
//! - **Broker requests**: Kite REST round-trips by operation and status
//! - **Sessions**: configure outcomes
//!
//! # Integration
//!
//! Recording is always on through the `metrics` facade. Exposition is
//! opt-in: with a non-zero port, a Prometheus HTTP listener is installed on
//! localhost. Stdout stays reserved for the protocol.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

static INSTALLED: OnceLock<SocketAddr> = OnceLock::new();

/// Install the Prometheus HTTP listener on `127.0.0.1:port`.
///
/// Must be called from within a tokio runtime. A second call is a no-op and
/// returns the address of the first listener.
///
/// # Errors
///
/// Returns an error if the recorder or listener cannot be installed.
pub fn init_metrics(port: u16) -> Result<SocketAddr, BuildError> {
    if let Some(addr) = INSTALLED.get() {
        return Ok(*addr);
    }

    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    register_metrics();

    Ok(*INSTALLED.get_or_init(|| addr))
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "kite_mcp_tool_calls_total",
        "Tool invocations by tool and outcome"
    );
    describe_histogram!(
        "kite_mcp_tool_call_duration_seconds",
        "Tool invocation latency, including broker round-trips"
    );
    describe_counter!(
        "kite_mcp_resource_reads_total",
        "Resource reads by URI and outcome"
    );
    describe_counter!(
        "kite_mcp_broker_requests_total",
        "Kite REST requests by operation and HTTP status"
    );
    describe_histogram!(
        "kite_mcp_broker_request_duration_seconds",
        "Kite REST round-trip latency"
    );
    describe_counter!(
        "kite_mcp_configure_total",
        "Session configure attempts by outcome"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completed normally.
    Success,
    /// Reported an error.
    Error,
}

impl Outcome {
    /// Outcome from an error flag.
    #[must_use]
    pub const fn from_error_flag(is_error: bool) -> Self {
        if is_error { Self::Error } else { Self::Success }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Record a tool invocation.
pub fn record_tool_call(tool: &str, outcome: Outcome, duration: Duration) {
    counter!(
        "kite_mcp_tool_calls_total",
        "tool" => tool.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!(
        "kite_mcp_tool_call_duration_seconds",
        "tool" => tool.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a resource read.
pub fn record_resource_read(uri: &str, outcome: Outcome) {
    counter!(
        "kite_mcp_resource_reads_total",
        "uri" => uri.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a Kite REST round-trip. `status` is 0 when no response arrived.
pub fn record_broker_request(operation: &'static str, status: u16, duration: Duration) {
    counter!(
        "kite_mcp_broker_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "kite_mcp_broker_request_duration_seconds",
        "operation" => operation
    )
    .record(duration.as_secs_f64());
}

/// Record a configure attempt.
pub fn record_configure(outcome: Outcome) {
    counter!("kite_mcp_configure_total", "outcome" => outcome.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Success.as_str(), "success");
        assert_eq!(Outcome::Error.as_str(), "error");
        assert_eq!(Outcome::from_error_flag(true), Outcome::Error);
        assert_eq!(Outcome::from_error_flag(false), Outcome::Success);
    }

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        record_tool_call("get_holdings", Outcome::Success, Duration::from_millis(3));
        record_resource_read("kite://orders", Outcome::Error);
        record_broker_request("holdings", 200, Duration::from_millis(2));
        record_configure(Outcome::Success);
    }
}
