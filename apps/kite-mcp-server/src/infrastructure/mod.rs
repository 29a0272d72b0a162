//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the application ports, plus the protocol
//! surface and process-level concerns.

/// Configuration and dependency injection.
pub mod config;

/// Kite Connect REST adapter.
pub mod kite;

/// MCP protocol, request routing and stdio transport.
pub mod mcp;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Logging and OpenTelemetry tracing.
pub mod telemetry;
