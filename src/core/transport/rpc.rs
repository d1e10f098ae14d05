//! JSON-RPC 2.0 message handling shared by the HTTP and SSE transports.
//!
//! The stdio transport is served by rmcp; the network transports decode
//! requests here and route them to the server's dispatcher.

use rmcp::ServerHandler;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::core::McpServer;
use crate::domains::tools::DispatchError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id never get a response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none() || self.method.starts_with("notifications/")
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Body could not be parsed as JSON.
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::error(None, PARSE_ERROR, format!("Parse error: {}", detail))
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, INVALID_REQUEST, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, INTERNAL_ERROR, msg)
    }

    /// Error code, if this is an error response.
    pub fn error_code(&self) -> Option<i32> {
        self.error.as_ref().map(|e| e.code)
    }
}

/// Decode one request from a raw body.
///
/// Malformed JSON yields a parse error; well-formed JSON that is not a
/// request yields an invalid-request error.
pub fn decode(body: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(body).map_err(JsonRpcResponse::parse_error)?;
    let id = value.get("id").cloned();
    serde_json::from_value(value).map_err(|e| {
        debug!("Rejected envelope: {}", e);
        JsonRpcResponse::invalid_request(id)
    })
}

/// Process a JSON-RPC request and return the response, if one is due.
pub async fn process_request(server: &McpServer, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        handle_notification(&request);
        return None;
    }

    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(server, request),
        "ping" => JsonRpcResponse::success(request.id, json!({})),
        "tools/list" => handle_tools_list(server, request),
        "tools/call" => handle_tools_call(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id, &request.method)
        }
    };
    Some(response)
}

fn handle_initialize(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");
    match serde_json::to_value(server.get_info()) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

fn handle_tools_list(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");
    match serde_json::to_value(server.tools()) {
        Ok(tools) => JsonRpcResponse::success(request.id, json!({ "tools": tools })),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id;
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(id, "Missing tool name");
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map.clone()),
        Some(_) => return JsonRpcResponse::invalid_params(id, "Tool arguments must be an object"),
    };

    info!(tool = name, "Processing tools/call request");
    match server.dispatcher().call_tool(name, arguments).await {
        Ok(envelope) => JsonRpcResponse::success(id, envelope.to_value()),
        Err(err @ DispatchError::UnknownTool(_)) => {
            JsonRpcResponse::error(id, METHOD_NOT_FOUND, err.to_string())
        }
    }
}

fn handle_notification(request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => info!("Client sent initialized notification"),
        method => debug!("Received notification: {}", method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    fn request(value: Value) -> JsonRpcRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_malformed_json_is_parse_error() {
        let err = decode("{ not json").unwrap_err();
        assert_eq!(err.error_code(), Some(PARSE_ERROR));
        assert_eq!(err.id, None);
    }

    #[test]
    fn test_decode_non_request_is_invalid_request() {
        let err = decode(r#"{"jsonrpc":"2.0","id":3}"#).unwrap_err();
        assert_eq!(err.error_code(), Some(INVALID_REQUEST));
        assert_eq!(err.id, Some(json!(3)));
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = server();
        let response = process_request(
            &server,
            request(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })),
        )
        .await;
        assert!(response.is_none());

        let response = process_request(
            &server,
            request(json!({ "jsonrpc": "2.0", "method": "tools/list" })),
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let response = process_request(
            &server(),
            request(json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} })),
        )
        .await
        .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "publishing-mcp-server");
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_and_ping() {
        let server = server();
        let response = process_request(
            &server,
            request(json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" })),
        )
        .await
        .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 26);
        assert!(tools[0]["inputSchema"].is_object());

        let response = process_request(
            &server,
            request(json!({ "jsonrpc": "2.0", "id": "p", "method": "ping" })),
        )
        .await
        .unwrap();
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server();

        let unknown_method = process_request(
            &server,
            request(json!({ "jsonrpc": "2.0", "id": 1, "method": "resources/list" })),
        )
        .await
        .unwrap();
        assert_eq!(unknown_method.error_code(), Some(METHOD_NOT_FOUND));

        let unknown_tool = process_request(
            &server,
            request(json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/call",
                "params": { "name": "nope" }
            })),
        )
        .await
        .unwrap();
        assert_eq!(unknown_tool.error_code(), Some(METHOD_NOT_FOUND));

        let bad_arguments = process_request(
            &server,
            request(json!({
                "jsonrpc": "2.0", "id": 3, "method": "tools/call",
                "params": { "name": "get_posts", "arguments": [1, 2] }
            })),
        )
        .await
        .unwrap();
        assert_eq!(bad_arguments.error_code(), Some(INVALID_PARAMS));

        let missing_name = process_request(
            &server,
            request(json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {} })),
        )
        .await
        .unwrap();
        assert_eq!(missing_name.error_code(), Some(INVALID_PARAMS));

        let wrong_version = process_request(
            &server,
            request(json!({ "jsonrpc": "1.0", "id": 5, "method": "ping" })),
        )
        .await
        .unwrap();
        assert_eq!(wrong_version.error_code(), Some(INVALID_REQUEST));
    }

    #[tokio::test]
    async fn test_validation_failure_is_tool_result_not_protocol_error() {
        let response = process_request(
            &server(),
            request(json!({
                "jsonrpc": "2.0", "id": 9, "method": "tools/call",
                "params": { "name": "get_posts", "arguments": { "display": "week" } }
            })),
        )
        .await
        .unwrap();
        assert!(response.error.is_none());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(
            result["content"][0]["text"]
                .as_str()
                .unwrap()
                .contains("year is required")
        );
    }
}
