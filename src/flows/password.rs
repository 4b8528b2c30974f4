//! Resource Owner Password Credentials Grant
//!
//! RFC 6749 Section 4.3.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

use super::token_request::{execute, TokenEndpointCall};
use crate::core::{ClientContext, HttpTransport};
use crate::error::OAuthError;
use crate::types::{AccessTokenResponse, GrantType};

/// Direct username/password token request.
pub struct PasswordGrantRequest<T: HttpTransport> {
    call: TokenEndpointCall,
    transport: Arc<T>,
    username: String,
    password: SecretString,
    otp: Option<SecretString>,
    scope: Option<String>,
}

impl<T: HttpTransport> PasswordGrantRequest<T> {
    pub fn new(
        context: &ClientContext,
        transport: Arc<T>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            call: TokenEndpointCall::new(context, |endpoints| endpoints.token),
            transport,
            username: username.into(),
            password: SecretString::new(password.into()),
            otp: None,
            scope: context.config().scope().map(String::from),
        }
    }

    /// One-time password for users with a second factor.
    pub fn otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(SecretString::new(otp.into()));
        self
    }

    /// Replace the configured scope; `None` omits it.
    pub fn scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.call.param(name.into(), value.into());
        self
    }

    pub fn dpop_proof(mut self, proof: impl Into<String>) -> Self {
        self.call.dpop_proof(proof.into());
        self
    }

    #[instrument(skip(self), fields(grant_type = GrantType::Password.as_str(), username = %self.username))]
    pub async fn send(self) -> Result<AccessTokenResponse, OAuthError> {
        let mut fields = vec![
            ("grant_type", GrantType::Password.as_str().to_string()),
            ("username", self.username),
            ("password", self.password.expose_secret().to_string()),
        ];
        if let Some(scope) = self.scope {
            fields.push(("scope", scope));
        }
        if let Some(otp) = &self.otp {
            fields.push(("otp", otp.expose_secret().to_string()));
        }

        let request = self.call.into_http_request(fields)?;
        let response = execute(self.transport.as_ref(), request).await?;
        AccessTokenResponse::from_http(response)
    }
}

impl<T: HttpTransport> std::fmt::Debug for PasswordGrantRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordGrantRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("has_otp", &self.otp.is_some())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
