//! Tool handler contract.
//!
//! Tools are written against the typed [`Tool`] trait: they declare a
//! parameter struct, and the struct's JSON Schema becomes the advertised
//! `inputSchema`. [`TypedTool`] erases that type so the registry can hold
//! every tool as an `Arc<dyn ToolHandler>`.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool as McpTool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::error::{ToolError, ToolResult};
use crate::core::client::ApiClient;

/// Immutable description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,

    /// Human readable description shown to clients.
    pub description: Cow<'static, str>,

    /// JSON Schema of the accepted arguments.
    pub input_schema: Arc<JsonObject>,
}

impl ToolDefinition {
    /// Convert into the MCP model type.
    pub fn to_tool(&self) -> McpTool {
        McpTool {
            name: self.name.into(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema.clone(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// One `{ "type": "text", "text": ... }` content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Result envelope of a tool call.
///
/// `isError` is omitted on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEnvelope {
    pub content: Vec<TextContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolEnvelope {
    fn text(text: String, is_error: Option<bool>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text,
            }],
            is_error,
        }
    }

    /// Successful result: the value pretty-printed with two-space indentation.
    pub fn json(value: &Value) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self::text(text, None)
    }

    /// Failed result carrying `"<context>: <cause>"` and, for upstream
    /// responses, the status code and raw body.
    pub fn failure(context: &str, error: &ToolError) -> Self {
        let mut text = format!("{}: {}", context, error);
        if let Some(status) = error.status() {
            text.push_str(&format!("\nStatus: {}", status));
        }
        if let Some(body) = error.body() {
            text.push_str(&format!("\nResponse Body: {}", body));
        }
        Self::text(text, Some(true))
    }

    /// Whether this envelope reports a failure.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Convert into the rmcp result type used on the stdio path.
    pub fn into_call_tool_result(self) -> CallToolResult {
        let content = self
            .content
            .into_iter()
            .map(|item| Content::text(item.text))
            .collect();
        let mut result = CallToolResult::success(content);
        result.is_error = self.is_error;
        result
    }

    /// Serialize for the JSON-RPC `result` field.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Cross-field rules checked after decoding and before any network call.
pub trait Validate {
    fn validate(&self) -> ToolResult<()> {
        Ok(())
    }
}

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

impl Validate for NoParams {}

/// A tool with a typed parameter struct.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    /// Decoded arguments.
    type Params: DeserializeOwned + JsonSchema + Validate + Send + 'static;

    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    fn description(&self) -> Cow<'static, str>;

    /// Prefix of the error text when the call fails, e.g. "Error creating post".
    fn failure_context(&self) -> Cow<'static, str>;

    /// Perform the upstream call.
    async fn call(&self, client: &ApiClient, params: Self::Params) -> ToolResult<Value>;
}

/// Type-erased handler stored in the registry.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Definition advertised by `tools/list`.
    fn definition(&self) -> &ToolDefinition;

    /// Prefix of the error text when the call fails.
    fn failure_context(&self) -> &str;

    /// Decode, validate and execute.
    async fn handle(&self, client: &ApiClient, arguments: JsonObject) -> ToolResult<Value>;
}

/// Adapter from [`Tool`] to [`ToolHandler`].
pub struct TypedTool<T: Tool> {
    tool: T,
    definition: ToolDefinition,
    failure_context: Cow<'static, str>,
}

impl<T: Tool> TypedTool<T> {
    pub fn new(tool: T) -> Self {
        let definition = ToolDefinition {
            name: T::NAME,
            description: tool.description(),
            input_schema: schema_for_type::<T::Params>().into(),
        };
        let failure_context = tool.failure_context();
        Self {
            tool,
            definition,
            failure_context,
        }
    }
}

#[async_trait]
impl<T: Tool> ToolHandler for TypedTool<T> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn failure_context(&self) -> &str {
        &self.failure_context
    }

    async fn handle(&self, client: &ApiClient, arguments: JsonObject) -> ToolResult<Value> {
        let params: T::Params = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(format!("Invalid arguments: {}", e)))?;
        params.validate()?;
        self.tool.call(client, params).await
    }
}

/// Box a typed tool for registration.
pub fn handler<T: Tool>(tool: T) -> Arc<dyn ToolHandler> {
    Arc::new(TypedTool::new(tool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::UpstreamError;
    use crate::core::config::UpstreamConfig;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        word: String,
    }

    impl Validate for EchoParams {
        fn validate(&self) -> ToolResult<()> {
            if self.word.is_empty() {
                return Err(ToolError::invalid_arguments("word must not be empty"));
            }
            Ok(())
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        type Params = EchoParams;
        const NAME: &'static str = "echo";

        fn description(&self) -> Cow<'static, str> {
            "Echo a word".into()
        }

        fn failure_context(&self) -> Cow<'static, str> {
            "Error echoing".into()
        }

        async fn call(&self, _client: &ApiClient, params: EchoParams) -> ToolResult<Value> {
            Ok(json!({ "word": params.word }))
        }
    }

    fn client() -> ApiClient {
        ApiClient::new(&UpstreamConfig::default()).unwrap()
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_success_envelope_is_pretty_json() {
        let envelope = ToolEnvelope::json(&json!({"id": 1}));
        assert_eq!(envelope.content[0].text, "{\n  \"id\": 1\n}");
        assert!(!envelope.is_error());
        let serialized = envelope.to_value();
        assert!(serialized.get("isError").is_none());
        assert_eq!(serialized["content"][0]["type"], "text");
    }

    #[test]
    fn test_failure_envelope_includes_status_and_body() {
        let err = ToolError::from(UpstreamError::Status {
            status: 400,
            message: Some("Bad Request".to_string()),
            body: r#"{"message":"Bad Request"}"#.to_string(),
        });
        let envelope = ToolEnvelope::failure("Error creating post", &err);
        assert_eq!(
            envelope.content[0].text,
            "Error creating post: Bad Request\nStatus: 400\nResponse Body: {\"message\":\"Bad Request\"}"
        );
        assert_eq!(envelope.to_value()["isError"], true);
    }

    #[test]
    fn test_failure_envelope_without_response() {
        let err = ToolError::invalid_arguments("name is required");
        let envelope = ToolEnvelope::failure("Error creating book", &err);
        assert_eq!(envelope.content[0].text, "Error creating book: name is required");
    }

    #[test]
    fn test_call_tool_result_conversion_keeps_flag() {
        let result = ToolEnvelope::json(&json!([])).into_call_tool_result();
        assert_eq!(result.is_error, None);
        let result = ToolEnvelope::failure("x", &ToolError::internal("y")).into_call_tool_result();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_definition_schema_comes_from_params() {
        let typed = TypedTool::new(EchoTool);
        let definition = typed.definition();
        assert_eq!(definition.name, "echo");
        let properties = definition.input_schema.get("properties").unwrap();
        assert!(properties.get("word").is_some());
        assert_eq!(definition.to_tool().name, "echo");
    }

    #[tokio::test]
    async fn test_typed_tool_decodes_and_validates() {
        let typed = TypedTool::new(EchoTool);
        let client = client();

        let value = typed.handle(&client, args(json!({"word": "hi"}))).await.unwrap();
        assert_eq!(value, json!({"word": "hi"}));

        let err = typed.handle(&client, args(json!({}))).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        let err = typed.handle(&client, args(json!({"word": ""}))).await.unwrap_err();
        assert_eq!(err.to_string(), "word must not be empty");
    }
}
