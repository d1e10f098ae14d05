//! Shared upstream API client.
//!
//! One [`ApiClient`] is built at startup from [`UpstreamConfig`] and shared
//! read-only by every tool invocation. It owns the HTTP connection pool, the
//! per-platform base URLs and the credentials; tools only supply a platform,
//! a method and a path.

mod auth;
mod error;

use reqwest::{Method, RequestBuilder, Response, header};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::UpstreamConfig;

pub use auth::{Credential, GHOST_ADMIN_AUDIENCE, GhostAdminKey, GhostClaims};
pub use error::{UpstreamError, UpstreamResult};

/// The upstream platforms a tool can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// BookStack wiki.
    Wiki,
    /// Ghost blog.
    Blog,
    /// Postiz social post scheduler.
    Scheduler,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Wiki => "wiki",
            Self::Blog => "blog",
            Self::Scheduler => "scheduler",
        })
    }
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl RetryPolicy {
    /// No retries at all.
    pub const NONE: Self = Self {
        max_retries: 0,
        delay: Duration::ZERO,
    };

    /// Create a policy.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

#[derive(Debug, Clone)]
struct Endpoint {
    base_url: String,
    credential: Credential,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// HTTP client for the wiki, blog and scheduler APIs.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    wiki: Endpoint,
    blog: Endpoint,
    scheduler: Endpoint,
}

impl ApiClient {
    /// Build the client from configuration.
    ///
    /// Fails only on unusable credentials (e.g. a malformed Ghost key);
    /// missing credentials produce anonymous endpoints.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::request(format!("failed to build HTTP client: {}", e)))?;

        let blog_credential = Credential::ghost(config.blog.admin_api_key.as_deref())?;
        if let Credential::GhostAdmin(key) = &blog_credential {
            info!("Ghost admin key {} loaded", key.id());
        }

        Ok(Self {
            http,
            wiki: Endpoint {
                base_url: config.wiki.base_url.clone(),
                credential: Credential::bookstack(
                    config.wiki.token_id.as_deref(),
                    config.wiki.token_secret.as_deref(),
                )?,
            },
            blog: Endpoint {
                base_url: config.blog.base_url.clone(),
                credential: blog_credential,
            },
            scheduler: Endpoint {
                base_url: config.scheduler.base_url.clone(),
                credential: Credential::postiz(config.scheduler.api_key.as_deref())?,
            },
        })
    }

    fn endpoint(&self, platform: Platform) -> &Endpoint {
        match platform {
            Platform::Wiki => &self.wiki,
            Platform::Blog => &self.blog,
            Platform::Scheduler => &self.scheduler,
        }
    }

    /// Start an authenticated request against a platform path.
    pub fn request(
        &self,
        platform: Platform,
        method: Method,
        path: &str,
    ) -> UpstreamResult<RequestBuilder> {
        let endpoint = self.endpoint(platform);
        let mut request = self.anonymous_request(platform, method, path);
        if let Some(value) = endpoint.credential.authorization()? {
            request = request.header(header::AUTHORIZATION, value);
        }
        Ok(request)
    }

    /// Start a request without the platform credential (e.g. for login).
    pub fn anonymous_request(
        &self,
        platform: Platform,
        method: Method,
        path: &str,
    ) -> RequestBuilder {
        let url = self.endpoint(platform).url(path);
        debug!(%platform, %method, %url, "Preparing upstream request");
        self.http.request(method, url)
    }

    /// Send a request and decode the JSON response.
    ///
    /// Non-2xx responses become [`UpstreamError::Status`] carrying the
    /// status code, the upstream's message if one can be found, and the raw
    /// body. An empty success body decodes to `Value::Null`.
    pub async fn send(&self, request: RequestBuilder) -> UpstreamResult<Value> {
        let response = request.send().await?;
        read_response(response).await
    }

    /// Send a request, retrying transient failures per `policy`.
    pub async fn send_with_retry(
        &self,
        request: RequestBuilder,
        policy: RetryPolicy,
    ) -> UpstreamResult<Value> {
        let mut attempt = 0;
        loop {
            let attempt_request = request
                .try_clone()
                .ok_or_else(|| UpstreamError::request("request body cannot be replayed"))?;

            match self.send(attempt_request).await {
                Err(err) if attempt < policy.max_retries && err.is_transient() => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        delay_ms = policy.delay.as_millis() as u64,
                        "Upstream request failed, retrying: {}",
                        err
                    );
                    tokio::time::sleep(policy.delay).await;
                }
                result => return result,
            }
        }
    }
}

async fn read_response(response: Response) -> UpstreamResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(extract_message);
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            message,
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}

/// Find a human readable message in the error shapes the platforms use:
/// `{"message"}` (Postiz), `{"error": {"message"}}` (BookStack) and
/// `{"errors": [{"message"}]}` (Ghost).
fn extract_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("message"),
        body.get("error").and_then(|e| e.get("message")),
        body.get("errors")
            .and_then(|e| e.get(0))
            .and_then(|e| e.get("message")),
        body.get("error"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
}
