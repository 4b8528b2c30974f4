//! Token Endpoint Requests
//!
//! Client authentication and form assembly shared by every request that
//! posts to a client-authenticated endpoint (token, revocation,
//! introspection).

use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use tracing::debug;
use url::form_urlencoded;
use url::Url;

use crate::core::{ClientContext, Endpoints, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ConfigurationError, OAuthError};
use crate::types::ClientAuthMethod;

/// Client credentials as they stood when a request was created.
#[derive(Clone)]
pub(crate) struct ClientCredentials {
    client_id: String,
    client_secret: Option<SecretString>,
    method: ClientAuthMethod,
}

impl ClientCredentials {
    pub(crate) fn from_context(context: &ClientContext) -> Self {
        let config = context.config();
        Self {
            client_id: config.client_id().to_string(),
            client_secret: config.client_secret().cloned(),
            method: config.effective_auth_method(),
        }
    }

    pub(crate) fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Form fields and `Authorization` header for this client.
    ///
    /// RFC 6749 Section 2.3.1: Basic credentials are form-urlencoded before
    /// base64. A method needing a secret falls back to sending only
    /// `client_id` when none is configured.
    fn authenticate(&self) -> (Vec<(&'static str, String)>, Option<String>) {
        let secret = self.client_secret.as_ref().map(|s| s.expose_secret().as_str());

        match (self.method, secret) {
            (ClientAuthMethod::ClientSecretBasic, Some(secret)) => {
                let credentials = format!("{}:{}", form_encode(&self.client_id), form_encode(secret));
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                (Vec::new(), Some(format!("Basic {}", encoded)))
            }
            (ClientAuthMethod::ClientSecretPost, Some(secret)) => (
                vec![
                    ("client_id", self.client_id.clone()),
                    ("client_secret", secret.to_string()),
                ],
                None,
            ),
            _ => (vec![("client_id", self.client_id.clone())], None),
        }
    }
}

fn form_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Snapshot shared by the grant and side request builders.
#[derive(Clone)]
pub(crate) struct TokenEndpointCall {
    endpoint: Result<Url, String>,
    credentials: ClientCredentials,
    dpop_proof: Option<String>,
    overrides: BTreeMap<String, String>,
}

impl TokenEndpointCall {
    pub(crate) fn new(context: &ClientContext, select: fn(Endpoints) -> Url) -> Self {
        Self {
            endpoint: context.endpoints().map(select).map_err(|e| e.to_string()),
            credentials: ClientCredentials::from_context(context),
            dpop_proof: context.dpop_proof.clone(),
            overrides: BTreeMap::new(),
        }
    }

    pub(crate) fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    pub(crate) fn endpoint(&self) -> Result<&Url, OAuthError> {
        self.endpoint.as_ref().map_err(|message| {
            ConfigurationError::InvalidConfig {
                message: message.clone(),
            }
            .into()
        })
    }

    pub(crate) fn param(&mut self, name: String, value: String) {
        self.overrides.insert(name, value);
    }

    pub(crate) fn dpop_proof(&mut self, proof: String) {
        self.dpop_proof = Some(proof);
    }

    /// Assemble the POST.
    ///
    /// Field order: request fields, client authentication, then per-request
    /// parameters. A per-request parameter replaces any field of the same
    /// name.
    pub(crate) fn into_http_request(
        self,
        fields: Vec<(&'static str, String)>,
    ) -> Result<HttpRequest, OAuthError> {
        let endpoint = self.endpoint()?.to_string();
        let (auth_fields, authorization) = self.credentials.authenticate();

        let mut pairs: Vec<(String, String)> = fields
            .into_iter()
            .chain(auth_fields)
            .filter(|(name, _)| !self.overrides.contains_key(*name))
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        pairs.extend(self.overrides);

        let mut request =
            HttpRequest::form_post(endpoint, &pairs).header("accept", "application/json");
        if let Some(authorization) = authorization {
            request = request.header("authorization", authorization);
        }
        if let Some(proof) = self.dpop_proof {
            request = request.header("dpop", proof);
        }

        Ok(request)
    }
}

/// Hand a request to the executor. Transport failures propagate as is.
pub(crate) async fn execute<T>(transport: &T, request: HttpRequest) -> Result<HttpResponse, OAuthError>
where
    T: HttpTransport + ?Sized,
{
    debug!(method = request.method.as_str(), url = %request.url, "Sending request");
    let response = transport.send(request).await?;
    debug!(status = response.status, "Received response");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OAuthClientConfig;

    fn context() -> ClientContext {
        let mut context = ClientContext::new(OAuthClientConfig::new());
        context.base_url("http://localhost:8080");
        context
    }

    fn token(endpoints: Endpoints) -> Url {
        endpoints.token
    }

    #[test]
    fn test_public_client_sends_client_id() {
        let request = TokenEndpointCall::new(&context(), token)
            .into_http_request(vec![("grant_type", "password".to_string())])
            .unwrap();

        assert_eq!(
            request.url,
            "http://localhost:8080/realms/test/protocol/openid-connect/token"
        );
        assert_eq!(request.form_value("client_id").as_deref(), Some("test-app"));
        assert!(request.form_value("client_secret").is_none());
        assert!(!request.headers.contains_key("authorization"));
    }

    #[test]
    fn test_basic_auth_encodes_credentials() {
        let mut context = context();
        context.client_with_secret("my app", "s3cr:et");

        let request = TokenEndpointCall::new(&context, token)
            .into_http_request(vec![])
            .unwrap();

        let expected = base64::engine::general_purpose::STANDARD.encode("my+app:s3cr%3Aet");
        assert_eq!(
            request.headers.get("authorization"),
            Some(&format!("Basic {}", expected))
        );
        assert!(request.form_value("client_id").is_none());
    }

    #[test]
    fn test_post_auth_puts_secret_in_body() {
        let mut context = context();
        context
            .client_with_secret("app", "secret")
            .config_mut()
            .set_auth_method(ClientAuthMethod::ClientSecretPost);

        let request = TokenEndpointCall::new(&context, token)
            .into_http_request(vec![])
            .unwrap();

        assert_eq!(request.form_value("client_id").as_deref(), Some("app"));
        assert_eq!(request.form_value("client_secret").as_deref(), Some("secret"));
        assert!(!request.headers.contains_key("authorization"));
    }

    #[test]
    fn test_override_and_dpop() {
        let mut context = context();
        context.dpop_proof("proof-jwt");

        let mut call = TokenEndpointCall::new(&context, token);
        call.param("client_id".to_string(), "other".to_string());
        call.param("resource".to_string(), "api".to_string());
        let request = call
            .into_http_request(vec![("grant_type", "client_credentials".to_string())])
            .unwrap();

        let client_ids: Vec<_> = request
            .form_pairs()
            .into_iter()
            .filter(|(k, _)| k == "client_id")
            .collect();
        assert_eq!(client_ids, vec![("client_id".to_string(), "other".to_string())]);
        assert_eq!(request.form_value("resource").as_deref(), Some("api"));
        assert_eq!(request.headers.get("dpop").map(String::as_str), Some("proof-jwt"));
    }

    #[test]
    fn test_missing_base_url() {
        let context = ClientContext::new(OAuthClientConfig::new());
        let result = TokenEndpointCall::new(&context, token).into_http_request(vec![]);
        assert!(matches!(result, Err(OAuthError::Configuration(_))));
    }
}
