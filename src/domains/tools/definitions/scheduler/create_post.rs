//! Create a social media post on Postiz.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use super::POSTS_PATH;
use crate::core::client::{ApiClient, Platform};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{Tool, Validate};

/// Minimum length of a post body, in characters.
const MIN_CONTENT_CHARS: usize = 6;

/// How Postiz should treat the new post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Draft,
    Schedule,
    #[default]
    Now,
}

/// Parameters for `create_post`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePostParams {
    #[schemars(description = "Text content of the post (minimum 6 characters)")]
    pub content: String,

    #[schemars(description = "Integration ID to post to")]
    pub integration_id: String,

    #[schemars(description = "ISO format date (e.g. \"2025-01-04T19:46:00.000Z\")")]
    pub publish_date: String,

    #[schemars(description = "Type of post (\"draft\", \"schedule\", or \"now\")")]
    #[serde(default)]
    pub post_type: PostType,

    #[schemars(description = "Optional list of media URLs to attach")]
    #[serde(default)]
    pub media_urls: Vec<String>,

    #[schemars(description = "Whether to create a short link")]
    #[serde(default)]
    pub short_link: bool,
}

impl Validate for CreatePostParams {
    fn validate(&self) -> ToolResult<()> {
        if self.content.chars().count() < MIN_CONTENT_CHARS {
            return Err(ToolError::invalid_arguments(
                "Content must be at least 6 characters long",
            ));
        }
        if self.publish_date.trim().is_empty() {
            return Err(ToolError::invalid_arguments(
                "publish_date is required and must be a string",
            ));
        }
        Ok(())
    }
}

impl CreatePostParams {
    /// Request body in the shape the public API expects.
    fn body(&self) -> Value {
        let mut value = vec![json!({ "content": self.content })];
        value.extend(self.media_urls.iter().map(|url| json!({ "media": url })));

        json!({
            "type": self.post_type,
            "shortLink": self.short_link,
            "date": self.publish_date,
            "posts": [{
                "integration": { "id": self.integration_id },
                "value": value,
            }],
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CreatePostTool;

#[async_trait]
impl Tool for CreatePostTool {
    type Params = CreatePostParams;
    const NAME: &'static str = "create_post";

    fn description(&self) -> Cow<'static, str> {
        "Create a new social media post on Postiz platform with optional media attachments and scheduling".into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        "Failed to create post".into()
    }

    #[instrument(skip_all, fields(integration = %params.integration_id, post_type = ?params.post_type))]
    async fn call(&self, client: &ApiClient, params: CreatePostParams) -> ToolResult<Value> {
        let request = client
            .request(Platform::Scheduler, Method::POST, POSTS_PATH)?
            .json(&params.body());
        let response = client.send(request).await?;
        info!("Post created");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{args, client};
    use crate::domains::tools::handlers::{ToolHandler, TypedTool};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params(value: Value) -> CreatePostParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = params(json!({
            "content": "Hello world",
            "integration_id": "int-1",
            "publish_date": "2025-01-04T19:46:00.000Z"
        }));
        assert_eq!(p.post_type, PostType::Now);
        assert!(p.media_urls.is_empty());
        assert!(!p.short_link);
    }

    #[test]
    fn test_short_content_rejected() {
        let p = params(json!({
            "content": "Hello",
            "integration_id": "int-1",
            "publish_date": "2025-01-04T19:46:00.000Z"
        }));
        let err = p.validate().unwrap_err();
        assert_eq!(err.to_string(), "Content must be at least 6 characters long");
    }

    #[test]
    fn test_six_characters_is_enough() {
        let p = params(json!({
            "content": "Hello!",
            "integration_id": "abc",
            "publish_date": "2025-01-04T19:46:00.000Z"
        }));
        assert!(p.validate().is_ok());

        // Counted in characters, not bytes.
        let p = params(json!({
            "content": "héllo",
            "integration_id": "abc",
            "publish_date": "2025-01-04T19:46:00.000Z"
        }));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_unknown_post_type_fails_decode() {
        let result = serde_json::from_value::<CreatePostParams>(json!({
            "content": "Hello world",
            "integration_id": "int-1",
            "publish_date": "2025-01-04",
            "post_type": "later"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_body_lists_media_after_content() {
        let p = params(json!({
            "content": "Hello world",
            "integration_id": "int-1",
            "publish_date": "2025-01-04T19:46:00.000Z",
            "post_type": "schedule",
            "media_urls": ["https://img/1.png"],
            "short_link": true
        }));
        assert_eq!(
            p.body(),
            json!({
                "type": "schedule",
                "shortLink": true,
                "date": "2025-01-04T19:46:00.000Z",
                "posts": [{
                    "integration": { "id": "int-1" },
                    "value": [{ "content": "Hello world" }, { "media": "https://img/1.png" }]
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_posts_to_public_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/public/v1/posts"))
            .and(header("Authorization", "postiz-key"))
            .and(body_json(json!({
                "type": "now",
                "shortLink": false,
                "date": "2025-01-04T19:46:00.000Z",
                "posts": [{ "integration": { "id": "int-1" }, "value": [{ "content": "Hello world" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TypedTool::new(CreatePostTool);
        let value = tool
            .handle(
                &client(&server.uri()),
                args(json!({
                    "content": "Hello world",
                    "integration_id": "int-1",
                    "publish_date": "2025-01-04T19:46:00.000Z"
                })),
            )
            .await
            .unwrap();
        assert_eq!(value, json!({ "id": 1 }));
    }
}
