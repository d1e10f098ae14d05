//! List the social channels connected to Postiz.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::core::client::{ApiClient, Platform};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::handlers::{NoParams, Tool};

#[derive(Debug, Clone, Copy)]
pub struct GetIntegrationsTool;

#[async_trait]
impl Tool for GetIntegrationsTool {
    type Params = NoParams;
    const NAME: &'static str = "get_integrations";

    fn description(&self) -> Cow<'static, str> {
        "Get list of integrations from Postiz API".into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        "Failed to get integrations".into()
    }

    async fn call(&self, client: &ApiClient, _params: NoParams) -> ToolResult<Value> {
        let request = client.request(Platform::Scheduler, Method::GET, "/public/v1/integrations")?;
        Ok(client.send(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{args, client};
    use crate::domains::tools::handlers::{ToolHandler, TypedTool};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ignores_extra_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/public/v1/integrations"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": "int-1", "providerIdentifier": "x" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let value = TypedTool::new(GetIntegrationsTool)
            .handle(&client(&server.uri()), args(json!({ "unused": true })))
            .await
            .unwrap();
        assert_eq!(value[0]["id"], "int-1");
    }
}
