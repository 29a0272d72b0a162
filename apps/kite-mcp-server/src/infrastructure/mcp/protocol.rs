//! MCP Protocol Types
//!
//! JSON-RPC 2.0 framing for the Model Context Protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC version tag.
pub const JSONRPC_VERSION: &str = "2.0";

/// Parse error.
pub const PARSE_ERROR: i32 = -32700;
/// Invalid request.
pub const INVALID_REQUEST: i32 = -32600;
/// Method not found.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid params.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal error.
pub const INTERNAL_ERROR: i32 = -32603;
/// Resource read attempted before configure.
pub const NOT_CONFIGURED: i32 = -32001;
/// Resource URI not published.
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// JSON-RPC 2.0 request or notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpRequest {
    /// Always `2.0`.
    pub jsonrpc: String,
    /// Absent for notifications. An explicit `null` is kept as `Some(Null)`
    /// and answered like any other request.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl McpRequest {
    /// Create a notification.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    /// Attach a request ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach parameters.
    #[must_use]
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Whether the sender expects no reply.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Deserialize a field that was present in the input, including `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpResponse {
    /// Always `2.0`.
    pub jsonrpc: String,
    /// ID of the request being answered; `null` when it could not be read.
    pub id: Value,
    /// Result on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl McpResponse {
    /// Successful response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error response.
    #[must_use]
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Whether this is a success response.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
    /// Extra details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create an error object.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach details.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// `-32700`
    #[must_use]
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, msg)
    }

    /// `-32600`
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, msg)
    }

    /// `-32601`
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    /// `-32602`
    #[must_use]
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, msg)
    }

    /// `-32603`
    #[must_use]
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, msg)
    }
}

/// Decode one line of input.
///
/// # Errors
///
/// Returns the error response to send back when the line is not valid JSON
/// or not a JSON-RPC 2.0 request.
pub fn parse_message(line: &str) -> Result<McpRequest, McpResponse> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| McpResponse::error(Value::Null, JsonRpcError::parse_error(format!("Parse error: {e}"))))?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);

    if !value.is_object() {
        return Err(McpResponse::error(
            id,
            JsonRpcError::invalid_request("Request must be a JSON object"),
        ));
    }

    let request: McpRequest = serde_json::from_value(value)
        .map_err(|e| McpResponse::error(id.clone(), JsonRpcError::invalid_request(format!("Invalid request: {e}"))))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpResponse::error(
            id,
            JsonRpcError::invalid_request(format!(
                "Unsupported jsonrpc version: {}",
                request.jsonrpc
            )),
        ));
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_requests() {
        let request =
            parse_message(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(request, McpRequest::new("tools/list").with_id(7));
        assert!(!request.is_notification());
    }

    #[test]
    fn parses_notifications() {
        let request =
            parse_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn null_id_is_a_request() {
        let request =
            parse_message(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(!request.is_notification());
        assert_eq!(request.id, Some(Value::Null));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let response = parse_message("{not json").unwrap_err();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[test]
    fn wrong_shape_is_an_invalid_request() {
        let response = parse_message(r#"{"jsonrpc":"2.0","id":"a"}"#).unwrap_err();
        assert_eq!(response.id, json!("a"));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);

        let response = parse_message("[1,2]").unwrap_err();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn wrong_version_is_an_invalid_request() {
        let response =
            parse_message(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#).unwrap_err();
        assert_eq!(response.id, json!(1));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn responses_always_carry_an_id() {
        let response = McpResponse::error(Value::Null, JsonRpcError::parse_error("bad"));
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains(r#""id":null"#));
        assert!(!text.contains("result"));
    }
}
