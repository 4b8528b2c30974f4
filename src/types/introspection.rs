//! Introspection Types
//!
//! Types for OAuth2 Token Introspection (RFC 7662) and Revocation (RFC 7009).

use serde::Deserialize;
use std::collections::HashMap;

use super::token::{parse_body, protocol_error_of};
use crate::core::HttpResponse;
use crate::error::{OAuthError, ProtocolError};

/// Token type hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
}

impl TokenTypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// Token introspection claims.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct IntrospectionResponse {
    /// Whether the token is active.
    #[serde(default)]
    pub active: bool,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    /// Client that requested the token.
    #[serde(default)]
    pub client_id: Option<String>,
    /// Resource owner username.
    #[serde(default)]
    pub username: Option<String>,
    /// Token type.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expiration timestamp (Unix seconds).
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at timestamp (Unix seconds).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Subject identifier.
    #[serde(default)]
    pub sub: Option<String>,
    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,
    /// JWT ID.
    #[serde(default)]
    pub jti: Option<String>,
    /// Additional claims.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl IntrospectionResponse {
    /// Get remaining lifetime in seconds.
    pub fn remaining_lifetime(&self) -> Option<i64> {
        self.exp.map(|exp| {
            let now = chrono::Utc::now().timestamp();
            (exp - now).max(0)
        })
    }

    /// Get scopes as vector.
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_ref()
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }
}

/// Introspection endpoint response.
#[derive(Clone, Debug)]
pub struct TokenIntrospectionResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Parsed claims (default when the request was rejected).
    pub introspection: IntrospectionResponse,
    /// Provider error, if the request was rejected.
    pub protocol_error: Option<ProtocolError>,
}

impl TokenIntrospectionResponse {
    /// Parse an introspection endpoint response.
    pub fn from_http(response: HttpResponse) -> Result<Self, OAuthError> {
        let introspection = parse_body(&response)?;
        let protocol_error = protocol_error_of(&response);

        Ok(Self {
            status_code: response.status,
            introspection,
            protocol_error,
        })
    }

    /// Whether the provider reports the token as active.
    pub fn is_active(&self) -> bool {
        self.status_code == 200 && self.introspection.active
    }
}

/// Revocation endpoint response.
#[derive(Clone, Debug)]
pub struct TokenRevocationResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Provider error, if the request was rejected.
    pub protocol_error: Option<ProtocolError>,
}

impl TokenRevocationResponse {
    /// Parse a revocation endpoint response.
    pub fn from_http(response: HttpResponse) -> Self {
        Self {
            protocol_error: protocol_error_of(&response),
            status_code: response.status,
        }
    }

    /// RFC 7009: 200 for revoked and for unknown tokens alike.
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.protocol_error.is_none()
    }
}
