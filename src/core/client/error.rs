//! Upstream call error types.

use thiserror::Error;

/// Result type for upstream API calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors raised while talking to an upstream platform.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The upstream answered with a non-2xx status.
    #[error("{}", describe_status(.status, .message))]
    Status {
        status: u16,
        message: Option<String>,
        body: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection, TLS or protocol failure before a response arrived.
    #[error("Request failed: {0}")]
    Network(reqwest::Error),

    /// Credentials are configured but unusable.
    #[error("Authentication setup failed: {0}")]
    Auth(String),

    /// The request could not be built or replayed.
    #[error("Invalid request: {0}")]
    Request(String),
}

fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Request failed with status code {}", status),
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "upstream".to_string()),
            }
        } else {
            Self::Network(err)
        }
    }
}

impl UpstreamError {
    /// Create an authentication setup error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a request construction error.
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// HTTP status code, when the upstream produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, when the upstream produced a response.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Timeouts, network failures, rate limiting and server errors are
    /// transient; other client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Auth(_) | Self::Request(_) => false,
        }
    }
}
