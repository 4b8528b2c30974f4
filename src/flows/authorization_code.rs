//! Authorization Code Grant
//!
//! RFC 6749 Section 4.1.3 - exchange of an authorization code for tokens.

use std::sync::Arc;
use tracing::instrument;

use super::token_request::{execute, TokenEndpointCall};
use crate::core::{ClientContext, HttpTransport};
use crate::error::OAuthError;
use crate::types::{AccessTokenResponse, GrantType};

/// Authorization code exchange.
///
/// Carries the PKCE verifier, redirect URI and session hints the context
/// held when the request was created.
pub struct AccessTokenRequest<T: HttpTransport> {
    call: TokenEndpointCall,
    transport: Arc<T>,
    code: String,
    redirect_uri: Option<String>,
    code_verifier: Option<String>,
    client_session_state: Option<String>,
    client_session_host: Option<String>,
}

impl<T: HttpTransport> AccessTokenRequest<T> {
    pub fn new(context: &ClientContext, transport: Arc<T>, code: impl Into<String>) -> Self {
        Self {
            call: TokenEndpointCall::new(context, |endpoints| endpoints.token),
            transport,
            code: code.into(),
            redirect_uri: context.get_redirect_uri().map(String::from),
            code_verifier: context.code_verifier.clone(),
            client_session_state: context.client_session_state.clone(),
            client_session_host: context.client_session_host.clone(),
        }
    }

    /// Override the PKCE verifier for this request.
    pub fn code_verifier(mut self, verifier: impl Into<String>) -> Self {
        self.code_verifier = Some(verifier.into());
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

    /// Post the exchange.
    #[instrument(skip(self), fields(grant_type = GrantType::AuthorizationCode.as_str()))]
    pub async fn send(self) -> Result<AccessTokenResponse, OAuthError> {
        let mut fields = vec![
            ("grant_type", GrantType::AuthorizationCode.as_str().to_string()),
            ("code", self.code),
        ];
        let optional = [
            ("redirect_uri", self.redirect_uri),
            ("code_verifier", self.code_verifier),
            ("client_session_state", self.client_session_state),
            ("client_session_host", self.client_session_host),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        );

        let request = self.call.into_http_request(fields)?;
        let response = execute(self.transport.as_ref(), request).await?;
        AccessTokenResponse::from_http(response)
    }
}
