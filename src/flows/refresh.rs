//! Token Refresh
//!
//! RFC 6749 Section 6 - Refreshing an Access Token.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

use super::token_request::{execute, TokenEndpointCall};
use crate::core::{ClientContext, HttpTransport};
use crate::error::OAuthError;
use crate::types::{AccessTokenResponse, GrantType};

/// Refresh token request.
pub struct RefreshRequest<T: HttpTransport> {
    call: TokenEndpointCall,
    transport: Arc<T>,
    refresh_token: SecretString,
    scope: Option<String>,
}

impl<T: HttpTransport> RefreshRequest<T> {
    pub fn new(context: &ClientContext, transport: Arc<T>, refresh_token: impl Into<String>) -> Self {
        Self {
            call: TokenEndpointCall::new(context, |endpoints| endpoints.token),
            transport,
            refresh_token: SecretString::new(refresh_token.into()),
            scope: None,
        }
    }

    /// Ask for a narrower scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
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

    #[instrument(skip(self), fields(grant_type = GrantType::RefreshToken.as_str()))]
    pub async fn send(self) -> Result<AccessTokenResponse, OAuthError> {
        let mut fields = vec![
            ("grant_type", GrantType::RefreshToken.as_str().to_string()),
            ("refresh_token", self.refresh_token.expose_secret().to_string()),
        ];
        if let Some(scope) = self.scope {
            fields.push(("scope", scope));
        }

        let request = self.call.into_http_request(fields)?;
        let response = execute(self.transport.as_ref(), request).await?;
        AccessTokenResponse::from_http(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::types::{ClientAuthMethod, OAuthClientConfig};
    use serde_json::json;

    #[tokio::test]
    async fn test_refresh_body() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(200, &json!({"access_token": "new", "refresh_token": "r2"}));

        let mut context = ClientContext::new(OAuthClientConfig::new());
        context
            .base_url("http://localhost:8080")
            .client_with_secret("app", "secret")
            .config_mut()
            .set_auth_method(ClientAuthMethod::ClientSecretPost);

        let response = RefreshRequest::new(&context, transport.clone(), "r1")
            .send()
            .await
            .unwrap();
        assert_eq!(response.refresh_token.as_deref(), Some("r2"));

        let request = transport.get_last_request().unwrap();
        assert_eq!(
            request.body.as_deref(),
            Some("grant_type=refresh_token&refresh_token=r1&client_id=app&client_secret=secret")
        );
    }

    #[tokio::test]
    async fn test_refresh_with_dpop_and_scope() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(400, &json!({"error": "invalid_dpop_proof"}));

        let mut context = ClientContext::new(OAuthClientConfig::new());
        context.base_url("http://localhost:8080").dpop_proof("ctx-proof");

        let response = RefreshRequest::new(&context, transport.clone(), "r1")
            .scope("openid email")
            .dpop_proof("fresh-proof")
            .send()
            .await
            .unwrap();
        assert_eq!(response.error(), Some("invalid_dpop_proof"));

        let request = transport.get_last_request().unwrap();
        assert_eq!(request.headers.get("dpop").map(String::as_str), Some("fresh-proof"));
        assert_eq!(request.form_value("scope").as_deref(), Some("openid email"));
    }
}
