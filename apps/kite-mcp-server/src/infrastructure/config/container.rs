//! Dependency Injection Container
//!
//! Wires one session into the dispatcher and catalog and puts the MCP server
//! on top.

use std::sync::Arc;

use super::settings::ServerConfig;
use crate::application::ports::BrokerConnector;
use crate::application::services::{BrokerCallExecutor, CommandDispatcher, ResourceCatalog, Session};
use crate::infrastructure::mcp::McpServer;

/// Wired application components.
#[derive(Debug)]
pub struct Container {
    session: Arc<Session>,
    server: Arc<McpServer>,
}

impl Container {
    /// Build every component for `config`, reaching the brokerage through
    /// `connector`.
    #[must_use]
    pub fn new(config: &ServerConfig, connector: Arc<dyn BrokerConnector>) -> Self {
        let session = Arc::new(Session::new());
        let executor = BrokerCallExecutor::new(
            config.executor.max_concurrent_calls,
            config.executor.call_timeout,
        );

        let dispatcher = Arc::new(CommandDispatcher::new(
            config.toolset,
            Arc::clone(&session),
            connector,
            executor.clone(),
        ));
        let catalog = Arc::new(ResourceCatalog::new(
            config.toolset,
            Arc::clone(&session),
            executor,
        ));

        Self {
            session,
            server: Arc::new(McpServer::new(dispatcher, catalog)),
        }
    }

    /// Shared session.
    #[must_use]
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// MCP request handler.
    #[must_use]
    pub fn server(&self) -> Arc<McpServer> {
        Arc::clone(&self.server)
    }
}
