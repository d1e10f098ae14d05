//! Current Postiz user.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::core::client::{ApiClient, Platform};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{NoParams, Tool};

#[derive(Debug, Clone, Copy)]
pub struct GetSelfTool;

#[async_trait]
impl Tool for GetSelfTool {
    type Params = NoParams;
    const NAME: &'static str = "get_self";

    fn description(&self) -> Cow<'static, str> {
        "Get current user information from Postiz API".into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        "Failed to get user info".into()
    }

    async fn call(&self, client: &ApiClient, _params: NoParams) -> ToolResult<Value> {
        let request = client.request(Platform::Scheduler, Method::GET, "/user/self")?;
        Ok(client.send(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{args, client};
    use crate::domains::tools::error::ToolError;
    use crate::domains::tools::handlers::{ToolEnvelope, ToolHandler, TypedTool};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_uses_shared_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/self"))
            .and(header("Authorization", "postiz-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u1" })))
            .expect(1)
            .mount(&server)
            .await;

        let value = TypedTool::new(GetSelfTool)
            .handle(&client(&server.uri()), args(json!({})))
            .await
            .unwrap();
        assert_eq!(value, json!({ "id": "u1" }));
    }

    #[tokio::test]
    async fn test_unauthorized_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/user/self"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
            )
            .mount(&server)
            .await;

        let tool = TypedTool::new(GetSelfTool);
        let err: ToolError = tool
            .handle(&client(&server.uri()), args(json!({})))
            .await
            .unwrap_err();
        let envelope = ToolEnvelope::failure(tool.failure_context(), &err);
        let text = &envelope.content[0].text;
        assert!(text.starts_with("Failed to get user info: Unauthorized"));
        assert!(text.contains("\nStatus: 401"));
    }
}
