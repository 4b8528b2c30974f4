//! User-Info Types

use serde::Deserialize;
use std::collections::HashMap;

use super::token::{parse_body, protocol_error_of};
use crate::core::HttpResponse;
use crate::error::{OAuthError, ProtocolError};

/// Standard OIDC claims plus anything provider specific.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    /// Other claims.
    #[serde(flatten)]
    pub claims: HashMap<String, serde_json::Value>,
}

/// User-info endpoint response.
#[derive(Clone, Debug)]
pub struct UserInfoResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers (lowercase names).
    pub headers: HashMap<String, String>,
    /// Claims from a JSON body.
    pub user_info: UserInfo,
    /// Raw token when the endpoint answers `application/jwt`.
    pub jwt: Option<String>,
    /// Provider error from the body or the `WWW-Authenticate` challenge.
    pub protocol_error: Option<ProtocolError>,
}

impl UserInfoResponse {
    /// Parse a user-info endpoint response.
    pub fn from_http(response: HttpResponse) -> Result<Self, OAuthError> {
        let protocol_error = protocol_error_of(&response);

        let (user_info, jwt) = if response.content_type() == Some("application/jwt") {
            (UserInfo::default(), Some(response.body.trim().to_string()))
        } else {
            (parse_body(&response)?, None)
        };

        Ok(Self {
            status_code: response.status,
            headers: response.headers,
            user_info,
            jwt,
            protocol_error,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.protocol_error.is_none()
    }
}
