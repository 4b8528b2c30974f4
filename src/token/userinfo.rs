//! User-Info Request
//!
//! OIDC Core Section 5.3. The access token travels in one of the three
//! RFC 6750 Section 2 positions, chosen per request.

use std::sync::Arc;
use tracing::instrument;
use url::Url;

use crate::core::{ClientContext, HttpRequest, HttpTransport};
use crate::error::{ConfigurationError, OAuthError};
use crate::flows::token_request::execute;
use crate::types::{UserInfoResponse, UserInfoTransport};

/// User-info request.
pub struct UserInfoRequest<T: HttpTransport> {
    endpoint: Result<Url, String>,
    transport: Arc<T>,
    access_token: String,
    token_transport: UserInfoTransport,
    dpop_proof: Option<String>,
}

impl<T: HttpTransport> UserInfoRequest<T> {
    pub fn new(context: &ClientContext, transport: Arc<T>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: context
                .endpoints()
                .map(|endpoints| endpoints.userinfo)
                .map_err(|e| e.to_string()),
            transport,
            access_token: access_token.into(),
            token_transport: context.config().userinfo_transport(),
            dpop_proof: context.dpop_proof.clone(),
        }
    }

    /// Choose where the access token goes.
    pub fn transport(mut self, token_transport: UserInfoTransport) -> Self {
        self.token_transport = token_transport;
        self
    }

    /// Bind the request to a DPoP key; switches the header scheme to `DPoP`.
    pub fn dpop_proof(mut self, proof: impl Into<String>) -> Self {
        self.dpop_proof = Some(proof.into());
        self
    }

    fn into_http_request(self) -> Result<HttpRequest, OAuthError> {
        let mut endpoint = self
            .endpoint
            .map_err(|message| ConfigurationError::InvalidConfig { message })?;

        let mut request = match self.token_transport {
            UserInfoTransport::AuthorizationHeader => {
                let scheme = if self.dpop_proof.is_some() { "DPoP" } else { "Bearer" };
                HttpRequest::get(endpoint.as_str())
                    .header("authorization", format!("{} {}", scheme, self.access_token))
            }
            UserInfoTransport::FormBody => {
                HttpRequest::form_post(endpoint.as_str(), &[("access_token", &self.access_token)])
            }
            UserInfoTransport::QueryParameter => {
                endpoint
                    .query_pairs_mut()
                    .append_pair("access_token", &self.access_token);
                HttpRequest::get(endpoint.as_str())
            }
        };

        request = request.header("accept", "application/json");
        if let Some(proof) = self.dpop_proof {
            request = request.header("dpop", proof);
        }
        Ok(request)
    }

    #[instrument(skip(self), fields(transport = ?self.token_transport))]
    pub async fn send(self) -> Result<UserInfoResponse, OAuthError> {
        let transport = Arc::clone(&self.transport);
        let request = self.into_http_request()?;
        let response = execute(transport.as_ref(), request).await?;
        UserInfoResponse::from_http(response)
    }
}
