//! Token Types
//!
//! Token endpoint responses.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

use crate::core::HttpResponse;
use crate::error::{OAuthError, ProtocolError, ResponseError};

/// Token endpoint response.
///
/// A provider error (HTTP 4xx with an OAuth error body) is a regular value
/// of this type with [`protocol_error`](Self::protocol_error) set.
#[derive(Clone, Debug)]
pub struct AccessTokenResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers (lowercase names).
    pub headers: HashMap<String, String>,
    /// Access token.
    pub access_token: Option<String>,
    /// Token type (usually "Bearer" or "DPoP").
    pub token_type: Option<String>,
    /// Expires in seconds.
    pub expires_in: Option<i64>,
    /// Refresh token lifetime in seconds.
    pub refresh_expires_in: Option<i64>,
    /// Refresh token.
    pub refresh_token: Option<String>,
    /// ID token (OIDC).
    pub id_token: Option<String>,
    /// Granted scopes.
    pub scope: Option<String>,
    /// Provider session identifier.
    pub session_state: Option<String>,
    /// Provider error, if the request was rejected.
    pub protocol_error: Option<ProtocolError>,
    /// Additional fields.
    pub extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenBody {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    session_state: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

impl AccessTokenResponse {
    /// Parse a token endpoint response.
    pub fn from_http(response: HttpResponse) -> Result<Self, OAuthError> {
        let body: TokenBody = parse_body(&response)?;
        let protocol_error = protocol_error_of(&response);

        let mut extra = body.extra;
        extra.remove("error");
        extra.remove("error_description");
        extra.remove("error_uri");

        Ok(Self {
            status_code: response.status,
            headers: response.headers,
            access_token: body.access_token,
            token_type: body.token_type,
            expires_in: body.expires_in,
            refresh_expires_in: body.refresh_expires_in,
            refresh_token: body.refresh_token,
            id_token: body.id_token,
            scope: body.scope,
            session_state: body.session_state,
            protocol_error,
            extra,
        })
    }

    /// Whether tokens were issued.
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.protocol_error.is_none()
    }

    /// The provider's error code, if any.
    pub fn error(&self) -> Option<&str> {
        self.protocol_error.as_ref().map(|e| e.error.as_str())
    }

    /// The provider's error description, if any.
    pub fn error_description(&self) -> Option<&str> {
        self.protocol_error
            .as_ref()
            .and_then(|e| e.error_description.as_deref())
    }

    /// Granted scopes as a list.
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_ref()
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Decode the access token's claims without verifying its signature.
    #[cfg(feature = "jwt")]
    pub fn access_token_claims(&self) -> Result<serde_json::Value, OAuthError> {
        let token = self.access_token.as_deref().ok_or_else(|| ResponseError::MissingField {
            field: "access_token".to_string(),
        })?;
        crate::token::decode_unverified(token)
    }

    /// Decode the ID token's claims without verifying its signature.
    #[cfg(feature = "jwt")]
    pub fn id_token_claims(&self) -> Result<serde_json::Value, OAuthError> {
        let token = self.id_token.as_deref().ok_or_else(|| ResponseError::MissingField {
            field: "id_token".to_string(),
        })?;
        crate::token::decode_unverified(token)
    }
}

/// Parse a JSON body.
///
/// A success status demands a valid body. Any other status tolerates an
/// empty or non-JSON body so the status code still reaches the caller.
pub(crate) fn parse_body<B>(response: &HttpResponse) -> Result<B, OAuthError>
where
    B: DeserializeOwned + Default,
{
    if response.body.trim().is_empty() {
        return Ok(B::default());
    }

    match serde_json::from_str(&response.body) {
        Ok(body) => Ok(body),
        Err(_) if !response.is_success() => Ok(B::default()),
        Err(e) => Err(ResponseError::InvalidJson {
            message: e.to_string(),
        }
        .into()),
    }
}

/// Extract the provider error from a body or a `WWW-Authenticate` challenge.
pub(crate) fn protocol_error_of(response: &HttpResponse) -> Option<ProtocolError> {
    ProtocolError::from_json(&response.body).or_else(|| {
        response
            .header("www-authenticate")
            .and_then(ProtocolError::from_www_authenticate)
    })
}
