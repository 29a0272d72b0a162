//! MCP Server
//!
//! Routes JSON-RPC methods to the command dispatcher and resource catalog.
//! Tool failures are results with `isError`; resource failures are JSON-RPC
//! errors.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Value, json};

use super::protocol::{
    JsonRpcError, McpRequest, McpResponse, NOT_CONFIGURED, PROTOCOL_VERSION, RESOURCE_NOT_FOUND,
};
use crate::application::error::DispatchError;
use crate::application::services::{CommandDispatcher, ResourceCatalog};
use crate::domain::resource::JSON_MIME_TYPE;
use crate::infrastructure::metrics::{self, Outcome};

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "kite-mcp-server";

/// Version reported in `serverInfo`.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP request handler.
#[derive(Debug)]
pub struct McpServer {
    dispatcher: Arc<CommandDispatcher>,
    catalog: Arc<ResourceCatalog>,
}

impl McpServer {
    /// Create a server over a dispatcher and catalog sharing one session.
    #[must_use]
    pub const fn new(dispatcher: Arc<CommandDispatcher>, catalog: Arc<ResourceCatalog>) -> Self {
        Self { dispatcher, catalog }
    }

    /// Handle one message. Notifications yield no response.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        tracing::debug!(method = %request.method, "Handling MCP request");

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params.as_ref()),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params.as_ref()).await,
            "resources/list" => self.handle_resources_list(id),
            "resources/read" => self.handle_resources_read(id, request.params.as_ref()).await,
            method => {
                tracing::warn!(method, "Unknown MCP method");
                McpResponse::error(id, JsonRpcError::method_not_found(method))
            }
        };

        Some(response)
    }

    fn handle_notification(&self, request: &McpRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => {
                tracing::info!(
                    toolset = %self.dispatcher.toolset(),
                    "Client initialized"
                );
            }
            "notifications/cancelled" => {
                tracing::debug!(params = ?request.params, "Client cancelled a request");
            }
            method => tracing::debug!(method, "Ignoring notification"),
        }
    }

    fn handle_initialize(&self, id: Value, params: Option<&Value>) -> McpResponse {
        let client_info = params.and_then(|p| p.get("clientInfo"));
        let client_name = client_info
            .and_then(|ci| ci.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let client_version = client_info
            .and_then(|ci| ci.get("version"))
            .and_then(Value::as_str)
            .unwrap_or("?");
        let requested_version = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or("?");

        tracing::info!(
            client = client_name,
            client_version,
            requested_version,
            "Client connected"
        );

        McpResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false },
                    "resources": { "subscribe": false, "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> McpResponse {
        let tools = self.dispatcher.descriptors();
        let names: Vec<&str> = tools.iter().map(|t| t.name).collect();
        tracing::info!(tools = ?names, "Listing tools");

        McpResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Value, params: Option<&Value>) -> McpResponse {
        let Some(params) = params else {
            return McpResponse::error(id, JsonRpcError::invalid_params("Missing params"));
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return McpResponse::error(id, JsonRpcError::invalid_params("Missing tool name"));
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let started = Instant::now();
        let response = self.dispatcher.execute(name, &arguments).await;

        let outcome = Outcome::from_error_flag(response.is_error);
        let label = if self.dispatcher.descriptors().iter().any(|d| d.name == name) {
            name
        } else {
            "unknown"
        };
        metrics::record_tool_call(label, outcome, started.elapsed());
        if name == self.dispatcher.toolset().configure_tool_name() {
            metrics::record_configure(outcome);
        }

        McpResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": response.text }],
                "isError": response.is_error
            }),
        )
    }

    fn handle_resources_list(&self, id: Value) -> McpResponse {
        McpResponse::success(id, json!({ "resources": self.catalog.list() }))
    }

    async fn handle_resources_read(&self, id: Value, params: Option<&Value>) -> McpResponse {
        let Some(uri) = params
            .and_then(|p| p.get("uri"))
            .and_then(Value::as_str)
            .filter(|uri| !uri.is_empty())
        else {
            return McpResponse::error(id, JsonRpcError::invalid_params("Missing uri"));
        };

        match self.catalog.read(uri).await {
            Ok(text) => {
                metrics::record_resource_read(uri, Outcome::Success);
                McpResponse::success(
                    id,
                    json!({
                        "contents": [{
                            "uri": uri,
                            "mimeType": JSON_MIME_TYPE,
                            "text": text
                        }]
                    }),
                )
            }
            Err(err) => {
                let label = match &err {
                    DispatchError::UnknownResource(_) => "unknown",
                    _ => uri,
                };
                metrics::record_resource_read(label, Outcome::Error);
                McpResponse::error(id, resource_error(uri, &err))
            }
        }
    }
}

/// JSON-RPC error for a failed resource read, one code per failure class.
fn resource_error(uri: &str, err: &DispatchError) -> JsonRpcError {
    let error = match err {
        DispatchError::UnknownResource(_) => JsonRpcError::new(RESOURCE_NOT_FOUND, err.to_string()),
        DispatchError::NotConfigured { .. } => JsonRpcError::new(NOT_CONFIGURED, err.to_string()),
        DispatchError::InvalidArguments(_) => JsonRpcError::invalid_params(err.to_string()),
        DispatchError::Configuration(_)
        | DispatchError::Broker(_)
        | DispatchError::UnknownCommand(_)
        | DispatchError::Timeout { .. }
        | DispatchError::Worker { .. } => {
            JsonRpcError::internal_error(format!("Failed to read resource {uri}: {err}"))
        }
    };
    error.with_data(json!({ "uri": uri, "kind": err.kind() }))
}
