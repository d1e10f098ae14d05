//! Configuration management for the MCP server.
//!
//! Configuration is read once at startup from environment variables (a `.env`
//! file is honoured) and is immutable afterwards. Command line flags may
//! override the transport section before the server is built.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream API endpoints and credentials.
    pub upstream: UpstreamConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Endpoints and static credentials for the three upstream platforms.
///
/// This is the only place credentials live; tools reach them exclusively
/// through the shared [`ApiClient`](crate::core::ApiClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Per-request timeout applied by the HTTP client, in seconds.
    pub timeout_secs: u64,

    /// BookStack wiki.
    pub wiki: WikiConfig,

    /// Ghost blog.
    pub blog: BlogConfig,

    /// Postiz social post scheduler.
    pub scheduler: SchedulerConfig,
}

/// BookStack API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Base URL of the BookStack instance (without `/api`).
    pub base_url: String,

    /// API token id.
    pub token_id: Option<String>,

    /// API token secret.
    pub token_secret: Option<String>,
}

/// Ghost Admin API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Base URL of the Ghost site.
    pub base_url: String,

    /// Admin API key in Ghost's `<id>:<hex secret>` format.
    pub admin_api_key: Option<String>,
}

/// Postiz API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Base URL of the Postiz API (including the `/api` prefix).
    pub base_url: String,

    /// API key sent verbatim in the `Authorization` header.
    pub api_key: Option<String>,
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "[REDACTED]")
}

/// Custom Debug implementations keep secrets out of logs.
impl std::fmt::Debug for WikiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiConfig")
            .field("base_url", &self.base_url)
            .field("token_id", &redact(&self.token_id))
            .field("token_secret", &redact(&self.token_secret))
            .finish()
    }
}

impl std::fmt::Debug for BlogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogConfig")
            .field("base_url", &self.base_url)
            .field("admin_api_key", &redact(&self.admin_api_key))
            .finish()
    }
}

impl std::fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            wiki: WikiConfig {
                base_url: "https://knowledge.oculair.ca".to_string(),
                token_id: None,
                token_secret: None,
            },
            blog: BlogConfig {
                base_url: "https://blog.emmanuelu.com".to_string(),
                admin_api_key: None,
            },
            scheduler: SchedulerConfig {
                base_url: "https://postiz.oculair.ca/api".to_string(),
                api_key: None,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "publishing-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl UpstreamConfig {
    /// Names of the credential variables that are not set.
    ///
    /// Missing credentials are not fatal: calls to the affected platform
    /// fail later with the upstream's own authentication error.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.wiki.token_id.is_none() {
            missing.push("BS_TOKEN_ID");
        }
        if self.wiki.token_secret.is_none() {
            missing.push("BS_TOKEN_SECRET");
        }
        if self.blog.admin_api_key.is_none() {
            missing.push("GHOST_ADMIN_API_KEY");
        }
        if self.scheduler.api_key.is_none() {
            missing.push("POSTIZ_API_KEY");
        }
        missing
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Self {
        Self::from_env_with_overrides(&[])
    }

    /// Load configuration from environment variables, with `overrides`
    /// (typically command line flags) taking precedence.
    pub fn from_env_with_overrides(overrides: &[(&str, String)]) -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| {
            overrides
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_lookup(&var);

        let upstream = &mut config.upstream;
        if let Some(timeout) = var("MCP_UPSTREAM_TIMEOUT_SECS").and_then(|t| t.parse().ok()) {
            upstream.timeout_secs = timeout;
        }

        if let Some(url) = var("BS_URL") {
            upstream.wiki.base_url = url;
        }
        upstream.wiki.token_id = var("BS_TOKEN_ID");
        upstream.wiki.token_secret = var("BS_TOKEN_SECRET");

        if let Some(url) = var("GHOST_API_URL") {
            upstream.blog.base_url = url;
        }
        upstream.blog.admin_api_key = var("GHOST_ADMIN_API_KEY");

        if let Some(url) = var("POSTIZ_API_URL") {
            upstream.scheduler.base_url = url;
        }
        upstream.scheduler.api_key = var("POSTIZ_API_KEY");

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.server.name, "publishing-mcp-server");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(
            config.upstream.scheduler.base_url,
            "https://postiz.oculair.ca/api"
        );
        assert!(config.transport.is_stdio());
    }

    #[test]
    fn test_credentials_from_variables() {
        let config = Config::from_lookup(lookup(&[
            ("BS_URL", "https://wiki.example.com"),
            ("BS_TOKEN_ID", "id"),
            ("BS_TOKEN_SECRET", "secret"),
            ("POSTIZ_API_KEY", "postiz-key"),
            ("GHOST_ADMIN_API_KEY", "abc:00ff"),
        ]));
        assert_eq!(config.upstream.wiki.base_url, "https://wiki.example.com");
        assert_eq!(config.upstream.wiki.token_id.as_deref(), Some("id"));
        assert_eq!(
            config.upstream.scheduler.api_key.as_deref(),
            Some("postiz-key")
        );
        assert!(config.upstream.missing_credentials().is_empty());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = Config::from_lookup(lookup(&[("POSTIZ_API_KEY", "  ")]));
        assert!(config.upstream.scheduler.api_key.is_none());
        assert!(
            config
                .upstream
                .missing_credentials()
                .contains(&"POSTIZ_API_KEY")
        );
    }

    #[test]
    fn test_transport_section_from_variables() {
        let config = Config::from_lookup(lookup(&[("MCP_TRANSPORT", "http"), ("PORT", "8080")]));
        match config.transport {
            TransportConfig::Http(http) => assert_eq!(http.port, 8080),
            other => panic!("expected HTTP transport, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = Config::from_lookup(lookup(&[("MCP_UPSTREAM_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let mut upstream = UpstreamConfig::default();
        upstream.wiki.token_secret = Some("super_secret_key".to_string());
        upstream.scheduler.api_key = Some("another_secret".to_string());
        let debug_str = format!("{:?}", upstream);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(!debug_str.contains("another_secret"));
    }
}
