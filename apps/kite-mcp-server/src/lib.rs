// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Kite MCP Server - Brokerage Tools for Model Context Protocol Clients
//!
//! Exposes a Zerodha Kite Connect account as MCP tools (quotes, order
//! placement, modification and cancellation, holdings, GTT triggers) and
//! read-only `kite://` resources, served as JSON-RPC over stdio.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Closed command and resource sets, no I/O
//!   - `command`: `CommandKind`, `Command`, tool schemas and argument validation
//!   - `resource`: `kite://` resource kinds and descriptors
//!   - `order`: place, modify and cancel requests
//!   - `toolset`: full and compact tool surfaces
//!
//! - **Application**: Dispatch and orchestration
//!   - `ports`: `BrokerPort`, `BrokerConnector`
//!   - `services`: `Session`, `CommandDispatcher`, `ResourceCatalog`, `BrokerCallExecutor`
//!   - `error`: `DispatchError`
//!
//! - **Infrastructure**: Adapters
//!   - `kite`: Kite Connect REST adapter
//!   - `mcp`: JSON-RPC protocol, request routing, stdio transport
//!   - `config`: environment settings and dependency injection container
//!   - `telemetry`, `metrics`: logging, tracing and Prometheus metrics
//!
//! # Session Lifecycle
//!
//! The server starts unconfigured. The configure tool builds a Kite client
//! from the supplied credentials and proves them with a profile fetch; only
//! then do the other tools and the resources reach the brokerage.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Commands, resources and order types.
pub mod domain;

/// Application layer - Ports, dispatch services and errors.
pub mod application;

/// Infrastructure layer - Kite adapter, MCP surface, config and telemetry.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::error::DispatchError;
pub use application::ports::{BrokerConnector, BrokerError, BrokerPort, UserProfile};
pub use application::services::{
    ActiveSession, BrokerCallExecutor, CommandDispatcher, ResourceCatalog, Session, ToolResponse,
};
pub use domain::command::{ArgumentError, Command, CommandDescriptor, CommandKind};
pub use domain::credentials::Credentials;
pub use domain::order::{CancelOrder, ModifyOrder, PlaceOrder};
pub use domain::resource::{ResourceDescriptor, ResourceKind};
pub use domain::toolset::Toolset;
pub use infrastructure::config::{ConfigError, Container, ServerConfig};
pub use infrastructure::kite::{KiteBrokerAdapter, KiteConfig, KiteConnector, KiteError};
pub use infrastructure::mcp::{McpRequest, McpResponse, McpServer, StdioTransport};
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
