//! Callback Types
//!
//! The authorization endpoint's answer, parsed from the browser's terminal
//! redirect URL.

use std::collections::HashMap;
use url::{form_urlencoded, Url};

use crate::error::ProtocolError;

/// Parameters returned by the authorization endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizationEndpointResponse {
    /// Authorization code (if success).
    pub code: Option<String>,
    /// Echoed state parameter.
    pub state: Option<String>,
    /// Error code (if authorization failed).
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
    /// Error URI.
    pub error_uri: Option<String>,
    /// Provider session identifier.
    pub session_state: Option<String>,
    /// Issuer identifier (RFC 9207).
    pub iss: Option<String>,
    /// Access token returned in the fragment by implicit/hybrid responses.
    pub access_token: Option<String>,
    /// ID token returned by implicit/hybrid responses.
    pub id_token: Option<String>,
    /// Token type for a returned access token.
    pub token_type: Option<String>,
    /// Unrecognized parameters.
    pub extra: HashMap<String, String>,
}

impl AuthorizationEndpointResponse {
    /// Parse from a redirect URL.
    ///
    /// Query parameters are read first, fragment parameters after them, so a
    /// value present in both places is taken from the fragment.
    pub fn from_url(url: &Url) -> Self {
        let mut response = Self::default();

        for (key, value) in url.query_pairs() {
            response.set(&key, value.into_owned());
        }

        if let Some(fragment) = url.fragment() {
            for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
                response.set(&key, value.into_owned());
            }
        }

        response
    }

    /// Parse from a redirect URL string.
    pub fn from_url_str(url_str: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url_str)?;
        Ok(Self::from_url(&url))
    }

    fn set(&mut self, key: &str, value: String) {
        match key {
            "code" => self.code = Some(value),
            "state" => self.state = Some(value),
            "error" => self.error = Some(value),
            "error_description" => self.error_description = Some(value),
            "error_uri" => self.error_uri = Some(value),
            "session_state" => self.session_state = Some(value),
            "iss" => self.iss = Some(value),
            "access_token" => self.access_token = Some(value),
            "id_token" => self.id_token = Some(value),
            "token_type" => self.token_type = Some(value),
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    /// Check if the response carries an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check if the response is successful.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (self.code.is_some() || self.access_token.is_some())
    }

    /// The provider's error, if any.
    pub fn protocol_error(&self) -> Option<ProtocolError> {
        self.error.as_ref().map(|error| ProtocolError {
            error: error.clone(),
            error_description: self.error_description.clone(),
            error_uri: self.error_uri.clone(),
        })
    }
}
