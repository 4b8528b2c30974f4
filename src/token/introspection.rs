//! Token Introspection
//!
//! RFC 7662 - OAuth 2.0 Token Introspection.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

use crate::core::{ClientContext, HttpTransport};
use crate::error::OAuthError;
use crate::flows::token_request::{execute, TokenEndpointCall};
use crate::types::{TokenIntrospectionResponse, TokenTypeHint};

/// Introspection request, authenticated as the configured client.
pub struct TokenIntrospectionRequest<T: HttpTransport> {
    call: TokenEndpointCall,
    transport: Arc<T>,
    token: SecretString,
    token_type_hint: Option<TokenTypeHint>,
}

impl<T: HttpTransport> TokenIntrospectionRequest<T> {
    pub fn new(context: &ClientContext, transport: Arc<T>, token: impl Into<String>) -> Self {
        Self {
            call: TokenEndpointCall::new(context, |endpoints| endpoints.introspection),
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

    #[instrument(skip(self), fields(client_id = %self.call.credentials().client_id()))]
    pub async fn send(self) -> Result<TokenIntrospectionResponse, OAuthError> {
        let mut fields = vec![("token", self.token.expose_secret().to_string())];
        if let Some(hint) = self.token_type_hint {
            fields.push(("token_type_hint", hint.as_str().to_string()));
        }

        let request = self.call.into_http_request(fields)?;
        let response = execute(self.transport.as_ref(), request).await?;
        TokenIntrospectionResponse::from_http(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockHttpTransport;
    use crate::types::OAuthClientConfig;
    use serde_json::json;

    #[tokio::test]
    async fn test_introspect_active_token() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json_response(
            200,
            &json!({"active": true, "username": "alice", "scope": "openid email"}),
        );

        let mut context = ClientContext::new(OAuthClientConfig::new());
        context
            .base_url("http://localhost:8080")
            .client_with_secret("resource-server", "secret");

        let response = TokenIntrospectionRequest::new(&context, transport.clone(), "at-1")
            .token_type_hint(TokenTypeHint::AccessToken)
            .send()
            .await
            .unwrap();

        assert!(response.is_active());
        assert_eq!(response.introspection.username.as_deref(), Some("alice"));

        let request = transport.get_last_request().unwrap();
        assert_eq!(
            request.url,
            "http://localhost:8080/realms/test/protocol/openid-connect/token/introspect"
        );
        assert_eq!(request.form_value("token").as_deref(), Some("at-1"));
        assert_eq!(
            request.form_value("token_type_hint").as_deref(),
            Some("access_token")
        );
    }
}
