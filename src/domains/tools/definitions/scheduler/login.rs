//! Exchange Postiz user credentials for an auth token.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::Method;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::core::client::{ApiClient, Platform};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{Tool, Validate};

/// Parameters for `login`.
#[derive(Clone, Deserialize, JsonSchema)]
pub struct LoginParams {
    #[schemars(description = "User email")]
    pub email: String,

    #[schemars(description = "User password")]
    pub password: String,
}

impl std::fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginParams")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for LoginParams {
    fn validate(&self) -> ToolResult<()> {
        if self.email.trim().is_empty() {
            return Err(ToolError::invalid_arguments(
                "Email is required and must be a string",
            ));
        }
        if self.password.is_empty() {
            return Err(ToolError::invalid_arguments(
                "Password is required and must be a string",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoginTool;

#[async_trait]
impl Tool for LoginTool {
    type Params = LoginParams;
    const NAME: &'static str = "login";

    fn description(&self) -> Cow<'static, str> {
        "Login to Postiz API and get auth token".into()
    }

    fn failure_context(&self) -> Cow<'static, str> {
        "Login failed".into()
    }

    #[instrument(skip_all, fields(email = %params.email))]
    async fn call(&self, client: &ApiClient, params: LoginParams) -> ToolResult<Value> {
        // The shared API key must not leak into a user login.
        let request = client
            .anonymous_request(Platform::Scheduler, Method::POST, "/auth/login")
            .json(&json!({ "email": params.email, "password": params.password }));
        let response = client.send(request).await?;
        info!("Login succeeded");
        Ok(response)
    }
}
