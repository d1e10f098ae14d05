//! Upstream credential handling.
//!
//! BookStack and Postiz use static `Authorization` headers. Ghost's Admin API
//! expects a short-lived HS256 JWT derived from an `<id>:<hex secret>` admin
//! key, so a fresh token is minted for every request.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use super::error::{UpstreamError, UpstreamResult};

/// Audience Ghost expects for Admin API tokens.
pub const GHOST_ADMIN_AUDIENCE: &str = "/admin/";

/// Lifetime of a minted Ghost token, in seconds.
pub const GHOST_TOKEN_TTL_SECS: i64 = 300;

/// How requests to one platform are authenticated.
#[derive(Clone)]
pub enum Credential {
    /// No credentials configured; requests go out unauthenticated.
    Anonymous,

    /// A fixed `Authorization` header value.
    Static(HeaderValue),

    /// Ghost Admin API key, exchanged for a JWT per request.
    GhostAdmin(GhostAdminKey),
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Static(_) => f.write_str("Static([REDACTED])"),
            Self::GhostAdmin(key) => f.debug_tuple("GhostAdmin").field(key).finish(),
        }
    }
}

impl Credential {
    /// BookStack `Token <id>:<secret>` credential; both halves are required.
    pub fn bookstack(token_id: Option<&str>, token_secret: Option<&str>) -> UpstreamResult<Self> {
        match (token_id, token_secret) {
            (Some(id), Some(secret)) => Self::header(format!("Token {}:{}", id, secret)),
            _ => Ok(Self::Anonymous),
        }
    }

    /// Postiz credential: the API key is sent verbatim.
    pub fn postiz(api_key: Option<&str>) -> UpstreamResult<Self> {
        match api_key {
            Some(key) => Self::header(key.to_string()),
            None => Ok(Self::Anonymous),
        }
    }

    /// Ghost Admin API credential.
    pub fn ghost(admin_api_key: Option<&str>) -> UpstreamResult<Self> {
        match admin_api_key {
            Some(raw) => Ok(Self::GhostAdmin(GhostAdminKey::parse(raw)?)),
            None => Ok(Self::Anonymous),
        }
    }

    fn header(value: String) -> UpstreamResult<Self> {
        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| UpstreamError::auth("credential contains invalid header characters"))?;
        value.set_sensitive(true);
        Ok(Self::Static(value))
    }

    /// The `Authorization` header to attach, if any.
    pub fn authorization(&self) -> UpstreamResult<Option<HeaderValue>> {
        match self {
            Self::Anonymous => Ok(None),
            Self::Static(value) => Ok(Some(value.clone())),
            Self::GhostAdmin(key) => {
                let token = key.mint(chrono::Utc::now().timestamp())?;
                let mut value = HeaderValue::from_str(&format!("Ghost {}", token))
                    .map_err(|_| UpstreamError::auth("minted token is not a valid header"))?;
                value.set_sensitive(true);
                Ok(Some(value))
            }
        }
    }
}

/// Parsed Ghost Admin API key.
#[derive(Clone)]
pub struct GhostAdminKey {
    id: String,
    secret: Vec<u8>,
}

impl std::fmt::Debug for GhostAdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhostAdminKey")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Claims carried by a Ghost Admin API token.
#[derive(Debug, Serialize, Deserialize)]
pub struct GhostClaims {
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

impl GhostAdminKey {
    /// Parse a key of the form `<id>:<hex secret>`.
    pub fn parse(raw: &str) -> UpstreamResult<Self> {
        let (id, secret) = raw
            .trim()
            .split_once(':')
            .ok_or_else(|| UpstreamError::auth("Ghost admin key must look like <id>:<secret>"))?;
        if id.is_empty() {
            return Err(UpstreamError::auth("Ghost admin key id is empty"));
        }
        let secret = hex::decode(secret)
            .map_err(|e| UpstreamError::auth(format!("Ghost admin key secret is not hex: {}", e)))?;
        Ok(Self {
            id: id.to_string(),
            secret,
        })
    }

    /// Key id, sent as the JWT `kid` header.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mint a token issued at `now` (unix seconds).
    pub fn mint(&self, now: i64) -> UpstreamResult<String> {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.id.clone());
        let claims = GhostClaims {
            iat: now,
            exp: now + GHOST_TOKEN_TTL_SECS,
            aud: GHOST_ADMIN_AUDIENCE.to_string(),
        };
        encode(&header, &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|e| UpstreamError::auth(format!("failed to sign Ghost token: {}", e)))
    }
}
