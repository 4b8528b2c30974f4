//! Authorization URL
//!
//! RFC 6749 Section 4.1.1 authorization request, with the PKCE (RFC 7636),
//! request object (RFC 9101), DPoP (RFC 9449) and Keycloak extensions a
//! test needs to exercise.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::core::{compute_challenge, ClientContext, StateProvider};
use crate::error::{ConfigurationError, OAuthError};
use crate::types::{AuthorizationUrl, PkceMethod};

/// Builds authorization-endpoint URLs from a snapshot of a [`ClientContext`].
///
/// `state` is not part of the snapshot: the provider is asked for a value on
/// every [`build`](Self::build).
#[derive(Clone)]
pub struct AuthorizationUrlBuilder {
    endpoint: Result<url::Url, String>,
    client_id: String,
    redirect_uri: Option<String>,
    response_type: String,
    response_mode: Option<String>,
    scope: Option<String>,
    nonce: Option<String>,
    max_age: Option<String>,
    prompt: Option<String>,
    ui_locales: Option<String>,
    request: Option<String>,
    request_uri: Option<String>,
    claims: Option<String>,
    kc_action: Option<String>,
    code_challenge: Option<String>,
    code_challenge_method: Option<String>,
    code_verifier: Option<String>,
    dpop_jkt: Option<String>,
    client_session_state: Option<String>,
    client_session_host: Option<String>,
    overrides: BTreeMap<String, String>,
    state: Option<Arc<dyn StateProvider>>,
}

impl AuthorizationUrlBuilder {
    /// Snapshot the fields of `context` an authorization request uses.
    pub fn new(context: &ClientContext) -> Self {
        let config = context.config();

        Self {
            endpoint: context
                .endpoints()
                .map(|endpoints| endpoints.authorization)
                .map_err(|e| e.to_string()),
            client_id: config.client_id().to_string(),
            redirect_uri: config.redirect_uri().map(String::from),
            response_type: config.response_type().to_string(),
            response_mode: config.response_mode().map(String::from),
            scope: config.scope().map(String::from),
            nonce: context.nonce.clone(),
            max_age: context.max_age.clone(),
            prompt: context.prompt.clone(),
            ui_locales: context.ui_locales.clone(),
            request: context.request.clone(),
            request_uri: context.request_uri.clone(),
            claims: context.claims.clone(),
            kc_action: context.kc_action.clone(),
            code_challenge: context.code_challenge.clone(),
            code_challenge_method: context.code_challenge_method.clone(),
            code_verifier: context.code_verifier.clone(),
            dpop_jkt: context.dpop_jkt.clone(),
            client_session_state: context.client_session_state.clone(),
            client_session_host: context.client_session_host.clone(),
            overrides: context.custom_parameters.clone(),
            state: context.state_provider_handle(),
        }
    }

    /// Add a parameter for this URL only.
    ///
    /// Like context custom parameters, it replaces a standard parameter of
    /// the same name.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Serialize the authorization URL.
    pub fn build(&self) -> Result<AuthorizationUrl, OAuthError> {
        let mut url = self
            .endpoint
            .clone()
            .map_err(|message| ConfigurationError::InvalidConfig { message })?;

        let redirect_uri =
            self.redirect_uri
                .as_deref()
                .ok_or_else(|| ConfigurationError::MissingRequired {
                    field: "redirect_uri".to_string(),
                })?;

        let state = self.state.as_ref().map(|provider| provider.state());

        let mut pairs: Vec<(&str, String)> = vec![
            ("response_type", self.response_type.clone()),
            ("client_id", self.client_id.clone()),
            ("redirect_uri", redirect_uri.to_string()),
        ];

        let optional = [
            ("response_mode", self.response_mode.clone()),
            ("state", state.clone()),
            ("nonce", self.nonce.clone()),
            ("scope", self.scope.clone()),
            ("max_age", self.max_age.clone()),
            ("prompt", self.prompt.clone()),
            ("ui_locales", self.ui_locales.clone()),
            ("request", self.request.clone()),
            ("request_uri", self.request_uri.clone()),
            ("claims", self.claims.clone()),
            ("kc_action", self.kc_action.clone()),
        ];
        pairs.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        );

        pairs.extend(self.pkce_pairs()?);

        let trailing = [
            ("dpop_jkt", self.dpop_jkt.clone()),
            ("client_session_state", self.client_session_state.clone()),
            ("client_session_host", self.client_session_host.clone()),
        ];
        pairs.extend(
            trailing
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        );

        {
            let mut query = url.query_pairs_mut();
            for (name, value) in pairs
                .iter()
                .filter(|(name, _)| !self.overrides.contains_key(*name))
            {
                query.append_pair(name, value);
            }
            for (name, value) in &self.overrides {
                query.append_pair(name, value);
            }
        }

        debug!(
            endpoint = %url.path(),
            client_id = %self.client_id,
            has_state = state.is_some(),
            "Built authorization URL"
        );

        Ok(AuthorizationUrl {
            url: url.into(),
            state,
        })
    }

    /// PKCE parameters.
    ///
    /// An explicit challenge is sent as set. A lone verifier has its
    /// challenge derived with the declared method, S256 if none.
    fn pkce_pairs(&self) -> Result<Vec<(&'static str, String)>, OAuthError> {
        let mut pairs = Vec::new();

        match (&self.code_challenge, &self.code_verifier) {
            (Some(challenge), _) => {
                pairs.push(("code_challenge", challenge.clone()));
                if let Some(method) = &self.code_challenge_method {
                    pairs.push(("code_challenge_method", method.clone()));
                }
            }
            (None, Some(verifier)) => {
                let method = match self.code_challenge_method.as_deref() {
                    Some(declared) => declared
                        .parse::<PkceMethod>()
                        .map_err(|message| ConfigurationError::InvalidConfig { message })?,
                    None => PkceMethod::S256,
                };
                pairs.push(("code_challenge", compute_challenge(verifier, method)));
                pairs.push(("code_challenge_method", method.as_str().to_string()));
            }
            (None, None) => {
                if let Some(method) = &self.code_challenge_method {
                    pairs.push(("code_challenge_method", method.clone()));
                }
            }
        }

        Ok(pairs)
    }
}

impl std::fmt::Debug for AuthorizationUrlBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationUrlBuilder")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
