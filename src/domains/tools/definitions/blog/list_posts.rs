//! List posts from the Ghost Admin API.
//!
//! The only tool that retries: network errors, 429 and 5xx responses are
//! retried with a fixed delay.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::client::{ApiClient, Platform, RetryPolicy};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{Tool, Validate};

const POSTS_PATH: &str = "/ghost/api/admin/posts/";

/// Publication state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum GhostPostStatus {
    Draft,
    Published,
    Scheduled,
}

impl GhostPostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Scheduled => "scheduled",
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    15
}

fn default_include() -> String {
    "tags,authors".to_string()
}

/// Parameters for `list_ghost_posts`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListGhostPostsParams {
    #[schemars(description = "Page number for pagination (default: 1)", range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,

    #[schemars(description = "Number of posts per page (default: 15)", range(min = 1))]
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[schemars(description = "Filter posts by status (draft, published, scheduled)")]
    #[serde(default)]
    pub status: Option<GhostPostStatus>,

    #[schemars(description = "Related data to include (default: \"tags,authors\")")]
    #[serde(default = "default_include")]
    pub include: String,
}

impl Validate for ListGhostPostsParams {
    fn validate(&self) -> ToolResult<()> {
        if self.page == 0 {
            return Err(ToolError::invalid_arguments("page must be 1 or greater"));
        }
        if self.limit == 0 {
            return Err(ToolError::invalid_arguments("limit must be 1 or greater"));
        }
        Ok(())
    }
}

impl ListGhostPostsParams {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("include", self.include.clone()),
        ];
        if let Some(status) = self.status {
            query.push(("filter", format!("status:{}", status.as_str())));
        }
        query
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListGhostPostsTool {
    retry: RetryPolicy,
}

impl ListGhostPostsTool {
    /// Use a custom retry policy.
    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self { retry }
    }
}

impl Default for ListGhostPostsTool {
    /// Three retries, one second apart.
    fn default() -> Self {
        Self::with_retry(RetryPolicy::new(3, Duration::from_secs(1)))
    }
}

#[async_trait]
impl Tool for ListGhostPostsTool {
    type Params = ListGhostPostsParams;
    const NAME: &'static str = "list_ghost_posts";

    fn description(&self) -> Cow<'static, str> {
        "Lists posts from Ghost blog with pagination and filtering options".into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        "Failed to list Ghost posts".into()
    }

    #[instrument(skip_all, fields(page = params.page, limit = params.limit))]
    async fn call(&self, client: &ApiClient, params: ListGhostPostsParams) -> ToolResult<Value> {
        let query = params.query();
        debug!(?query, "Listing Ghost posts");
        let request = client
            .request(Platform::Blog, Method::GET, POSTS_PATH)?
            .query(&query);
        Ok(client.send_with_retry(request, self.retry).await?)
    }
}
