//! Tool call dispatch.
//!
//! Resolves a tool by name, runs it once against the shared API client and
//! wraps the outcome in a [`ToolEnvelope`]. Handler failures never escape as
//! protocol errors; only an unknown tool name does.

use std::sync::Arc;

use rmcp::model::JsonObject;
use tracing::{info, instrument, warn};

use super::error::DispatchError;
use super::handlers::{ToolDefinition, ToolEnvelope};
use super::registry::ToolRegistry;
use crate::core::client::ApiClient;

/// Routes tool calls to registered handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    client: Arc<ApiClient>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, client: Arc<ApiClient>) -> Self {
        Self { registry, client }
    }

    /// Definitions of every registered tool, in registration order.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.list().into_iter().cloned().collect()
    }

    /// Invoke a tool.
    ///
    /// Missing arguments are treated as an empty object.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<ToolEnvelope, DispatchError> {
        let handler = self.registry.resolve(name).ok_or_else(|| {
            warn!("Unknown tool requested");
            DispatchError::UnknownTool(name.to_string())
        })?;

        match handler
            .handle(&self.client, arguments.unwrap_or_default())
            .await
        {
            Ok(value) => {
                info!("Tool call succeeded");
                Ok(ToolEnvelope::json(&value))
            }
            Err(err) => {
                warn!(status = ?err.status(), "Tool call failed: {}", err);
                Ok(ToolEnvelope::failure(handler.failure_context(), &err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{args, client};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dispatcher(base: &str) -> Dispatcher {
        Dispatcher::new(
            Arc::new(ToolRegistry::with_builtin_tools().unwrap()),
            Arc::new(client(base)),
        )
    }

    async fn server_expecting_no_calls() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let server = server_expecting_no_calls().await;
        let err = dispatcher(&server.uri())
            .call_tool("does_not_exist", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(name) if name == "does_not_exist"));
    }

    #[tokio::test]
    async fn test_create_post_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/public/v1/posts"))
            .and(body_partial_json(json!({
                "posts": [{ "integration": { "id": "abc" }, "value": [{ "content": "Hello!" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = dispatcher(&server.uri())
            .call_tool(
                "create_post",
                Some(args(json!({
                    "content": "Hello!",
                    "integration_id": "abc",
                    "publish_date": "2025-01-04T19:46:00.000Z"
                }))),
            )
            .await
            .unwrap();
        assert_eq!(envelope.content[0].text, "{\n  \"id\": 1\n}");
        assert_eq!(envelope.is_error, None);
        assert!(envelope.to_value().get("isError").is_none());
    }

    #[tokio::test]
    async fn test_short_content_never_reaches_upstream() {
        let server = server_expecting_no_calls().await;
        let envelope = dispatcher(&server.uri())
            .call_tool(
                "create_post",
                Some(args(json!({
                    "content": "Hello",
                    "integration_id": "int-1",
                    "publish_date": "2025-01-04T19:46:00.000Z"
                }))),
            )
            .await
            .unwrap();
        assert!(envelope.is_error());
        assert_eq!(
            envelope.content[0].text,
            "Failed to create post: Content must be at least 6 characters long"
        );
    }

    #[tokio::test]
    async fn test_get_posts_without_year_never_reaches_upstream() {
        let server = server_expecting_no_calls().await;
        let envelope = dispatcher(&server.uri())
            .call_tool(
                "get_posts",
                Some(args(json!({ "display": "week", "month": 5, "week": 20 }))),
            )
            .await
            .unwrap();
        assert!(envelope.is_error());
        assert!(envelope.content[0].text.contains("year is required"));
    }

    #[tokio::test]
    async fn test_missing_arguments_become_decode_failure() {
        let server = server_expecting_no_calls().await;
        let envelope = dispatcher(&server.uri())
            .call_tool("read_book", None)
            .await
            .unwrap();
        assert!(envelope.is_error());
        assert!(envelope.content[0].text.starts_with("Error reading book: Invalid arguments"));
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/books/5"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({ "error": { "message": "Book not found" } })),
            )
            .mount(&server)
            .await;

        let envelope = dispatcher(&server.uri())
            .call_tool("read_book", Some(args(json!({ "id": 5 }))))
            .await
            .unwrap();
        let text = &envelope.content[0].text;
        assert!(text.starts_with("Error reading book: Book not found\nStatus: 404\nResponse Body: "));
        assert!(envelope.is_error());
    }

    #[test]
    fn test_list_tools_matches_registry() {
        let d = dispatcher("http://127.0.0.1:9");
        let listed: Vec<_> = d.list_tools().iter().map(|t| t.name).collect();
        assert_eq!(listed.len(), 26);
        assert_eq!(listed.first(), Some(&"create_book"));
        assert_eq!(listed.last(), Some(&"login"));
    }
}
