//! Client Credentials Grant
//!
//! RFC 6749 Section 4.4 - Client Credentials Grant.

use std::sync::Arc;
use tracing::instrument;

use super::token_request::{execute, TokenEndpointCall};
use crate::core::{ClientContext, HttpTransport};
use crate::error::OAuthError;
use crate::types::{AccessTokenResponse, GrantType};

/// Service-account token request.
pub struct ClientCredentialsGrantRequest<T: HttpTransport> {
    call: TokenEndpointCall,
    transport: Arc<T>,
    scope: Option<String>,
}

impl<T: HttpTransport> ClientCredentialsGrantRequest<T> {
    pub fn new(context: &ClientContext, transport: Arc<T>) -> Self {
        Self {
            call: TokenEndpointCall::new(context, |endpoints| endpoints.token),
            transport,
            scope: context.config().scope().map(String::from),
        }
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

    #[instrument(skip(self), fields(grant_type = GrantType::ClientCredentials.as_str()))]
    pub async fn send(self) -> Result<AccessTokenResponse, OAuthError> {
        let mut fields = vec![("grant_type", GrantType::ClientCredentials.as_str().to_string())];
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
    use crate::types::OAuthClientConfig;
    use base64::Engine;
    use serde_json::json;

    #[tokio::test]
    async fn test_client_credentials_with_basic_auth() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({"access_token": "service-token", "token_type": "Bearer", "expires_in": 60}),
        );

        let mut context = ClientContext::new(OAuthClientConfig::new());
        context
            .base_url("http://localhost:8080")
            .client_with_secret("service", "secret");

        let response = ClientCredentialsGrantRequest::new(&context, transport.clone())
            .scope(Some("api".to_string()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.access_token.as_deref(), Some("service-token"));
        assert_eq!(response.expires_in, Some(60));

        let request = transport.get_last_request().unwrap();
        let expected = base64::engine::general_purpose::STANDARD.encode("service:secret");
        assert_eq!(
            request.headers.get("authorization"),
            Some(&format!("Basic {}", expected))
        );
        assert_eq!(
            request.form_value("grant_type").as_deref(),
            Some("client_credentials")
        );
        assert_eq!(request.form_value("scope").as_deref(), Some("api"));
    }

    #[tokio::test]
    async fn test_unauthorized_client() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            401,
            &json!({"error": "unauthorized_client", "error_description": "Client not enabled"}),
        );

        let mut context = ClientContext::new(OAuthClientConfig::new());
        context.base_url("http://localhost:8080");

        let response = ClientCredentialsGrantRequest::new(&context, transport)
            .send()
            .await
            .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error(), Some("unauthorized_client"));
        assert_eq!(response.error_description(), Some("Client not enabled"));
    }
}
