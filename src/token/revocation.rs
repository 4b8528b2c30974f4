//! Token Revocation
//!
//! RFC 7009 - OAuth 2.0 Token Revocation.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

use crate::core::{ClientContext, HttpTransport};
use crate::error::OAuthError;
use crate::flows::token_request::{execute, TokenEndpointCall};
use crate::types::{TokenRevocationResponse, TokenTypeHint};

/// Revocation request.
pub struct TokenRevocationRequest<T: HttpTransport> {
    call: TokenEndpointCall,
    transport: Arc<T>,
    token: SecretString,
    token_type_hint: Option<TokenTypeHint>,
}

impl<T: HttpTransport> TokenRevocationRequest<T> {
    pub fn new(context: &ClientContext, transport: Arc<T>, token: impl Into<String>) -> Self {
        Self {
            call: TokenEndpointCall::new(context, |endpoints| endpoints.revocation),
            transport,
            token: SecretString::new(token.into()),
            token_type_hint: None,
        }
    }

    pub fn token_type_hint(mut self, hint: TokenTypeHint) -> Self {
        self.token_type_hint = Some(hint);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.call.param(name.into(), value.into());
        self
    }

    /// Revoke the token.
    #[instrument(skip(self), fields(client_id = %self.call.credentials().client_id()))]
    pub async fn send(self) -> Result<TokenRevocationResponse, OAuthError> {
        let mut fields = vec![("token", self.token.expose_secret().to_string())];
        if let Some(hint) = self.token_type_hint {
            fields.push(("token_type_hint", hint.as_str().to_string()));
        }

        let request = self.call.into_http_request(fields)?;
        let response = execute(self.transport.as_ref(), request).await?;
        Ok(TokenRevocationResponse::from_http(response))
    }
}
