//! Kite MCP Server Binary
//!
//! Serves MCP over stdin/stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin kite-mcp-server
//! ```
//!
//! Kite credentials are not read from the environment. The client supplies
//! them through the configure tool.
//!
//! # Environment Variables
//!
//! - `KITE_MCP_TOOLSET`: full | compact (default: full)
//! - `KITE_API_BASE_URL`: Kite REST base URL (default: <https://api.kite.trade>)
//! - `KITE_HTTP_TIMEOUT_SECS`: HTTP timeout (default: 30)
//! - `KITE_MCP_CALL_TIMEOUT_SECS`: per broker call timeout (default: 60)
//! - `KITE_MCP_MAX_CONCURRENT_CALLS`: broker calls in flight (default: 8)
//! - `KITE_MCP_METRICS_PORT`: Prometheus listener port, 0 disables (default: 0)
//! - `OTEL_ENABLED`: export traces over OTLP (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: service name (default: kite-mcp-server)
//! - `RUST_LOG`: log filter (default: kite_mcp_server=info)

use std::sync::Arc;

use anyhow::Context;
use kite_mcp_server::infrastructure::metrics::init_metrics;
use kite_mcp_server::infrastructure::telemetry;
use kite_mcp_server::{Container, KiteConnector, ServerConfig, StdioTransport};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = telemetry::init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Kite MCP server");

    let config = ServerConfig::from_env()?;
    log_config(&config);

    if config.metrics_enabled() {
        match init_metrics(config.metrics_port) {
            Ok(addr) => tracing::info!(%addr, "Prometheus metrics listener started"),
            Err(e) => tracing::warn!(error = %e, "Failed to start metrics listener, continuing without"),
        }
    }

    let connector = KiteConnector::new(config.kite.clone()).context("failed to build Kite HTTP client")?;
    let container = Container::new(&config, Arc::new(connector));

    let shutdown_token = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown_token.clone()));

    StdioTransport::stdio()
        .serve(container.server(), shutdown_token)
        .await?;

    tracing::info!("Kite MCP server stopped");
    Ok(())
}

fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Log the parsed configuration.
fn log_config(config: &ServerConfig) {
    tracing::info!(
        toolset = %config.toolset,
        kite_base_url = %config.kite.base_url,
        http_timeout_secs = config.kite.timeout.as_secs(),
        call_timeout_secs = config.executor.call_timeout.as_secs(),
        max_concurrent_calls = config.executor.max_concurrent_calls,
        metrics_port = config.metrics_port,
        "Configuration loaded"
    );
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
