//! OAuth Test Client Error Types
//!
//! Failures that abort an operation live in [`OAuthError`]. Errors reported by
//! the identity provider itself are data ([`ProtocolError`]) carried inside the
//! response objects, so tests can assert on expected provider-side failures.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Root error type for the test client.
#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("Invalid response: {0}")]
    InvalidResponse(#[from] ResponseError),
}

impl OAuthError {
    /// Get error code for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "OAUTH_CONFIG",
            Self::Transport(_) => "OAUTH_TRANSPORT",
            Self::Navigation(_) => "OAUTH_NAVIGATION",
            Self::Authorization(_) => "OAUTH_AUTH",
            Self::InvalidResponse(_) => "OAUTH_RESPONSE",
        }
    }

    /// Check if the exchange never completed at the HTTP level.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Configuration error, raised when a request is serialized.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },
}

/// The HTTP executor could not complete the exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("TLS error: {message}")]
    TlsError { message: String },

    #[error("Failed to read response body: {message}")]
    BodyReadFailed { message: String },
}

/// The interactive session never reached the expected redirect target.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// The session never waits on its own. Callers wrapping a login in
    /// their own deadline report expiry with this variant:
    ///
    /// ```rust,ignore
    /// let budget = Duration::from_secs(10);
    /// let response = tokio::time::timeout(budget, client.do_login("alice", "secret"))
    ///     .await
    ///     .map_err(|_| NavigationError::NavigationTimeout { elapsed: budget })??;
    /// ```
    #[error("Navigation timed out after {elapsed:?}")]
    NavigationTimeout { elapsed: Duration },

    #[error("Unexpected page: expected redirect to {expected}, browser is at {actual}")]
    UnexpectedPage { expected: String, actual: String },

    #[error("Page unreachable: {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Login form element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Login flow in state {state} cannot {action}")]
    InvalidState {
        state: &'static str,
        action: &'static str,
    },
}

/// Correlation failure between an authorization request and its response.
#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error("State parameter mismatch: expected {expected:?}, received {received:?}")]
    StateMismatch {
        expected: Option<String>,
        received: Option<String>,
    },
}

/// Body could not be parsed where one is mandatory.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid redirect URL: {url}")]
    InvalidRedirectUrl { url: String },

    #[error("Malformed token: {message}")]
    MalformedToken { message: String },
}

/// Result type for test client operations.
pub type OAuthResult<T> = Result<T, OAuthError>;

/// OAuth error reported by the provider (RFC 6749 Section 5.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtocolError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

impl ProtocolError {
    /// Parse a protocol error from a JSON body.
    pub fn from_json(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Parse a protocol error from a `WWW-Authenticate` challenge
    /// (RFC 6750 Section 3), e.g. `Bearer error="invalid_token"`.
    pub fn from_www_authenticate(header: &str) -> Option<Self> {
        let (_, params) = header.trim().split_once(' ')?;

        let mut error = None;
        let mut error_description = None;
        let mut error_uri = None;

        for part in split_challenge_params(params) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim() {
                "error" => error = Some(value),
                "error_description" => error_description = Some(value),
                "error_uri" => error_uri = Some(value),
                _ => {}
            }
        }

        error.map(|error| Self {
            error,
            error_description,
            error_uri,
        })
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

// Commas inside quoted values do not separate parameters.
fn split_challenge_params(params: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (index, ch) in params.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&params[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&params[start..]);
    parts
}
