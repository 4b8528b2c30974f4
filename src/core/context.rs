//! Client Context
//!
//! Protocol parameters accumulated by a test before it builds an
//! authorization URL or a token-endpoint request.
//!
//! Setters never validate. Whatever is set is checked when a builder
//! serializes it, so tests can drive a provider with deliberately broken
//! parameters. Builders copy what they need when they are created: a later
//! mutation affects the next builder, never one that already exists.
//!
//! The context is meant for one sequential test script. Mutation needs
//! `&mut`, and nothing inside is synchronized.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::endpoints::Endpoints;
use super::pkce::{DefaultPkceGenerator, PkceGenerator};
use super::state::{FixedState, RandomState, StateProvider};
use crate::error::{ConfigurationError, OAuthError};
use crate::types::{OAuthClientConfig, PkceMethod, PkceParams};

/// Mutable per-client protocol state.
pub struct ClientContext {
    pub(crate) base_url: Option<String>,
    pub(crate) config: OAuthClientConfig,
    pub(crate) custom_parameters: BTreeMap<String, String>,
    pub(crate) code_challenge: Option<String>,
    pub(crate) code_challenge_method: Option<String>,
    pub(crate) code_verifier: Option<String>,
    pub(crate) client_session_state: Option<String>,
    pub(crate) client_session_host: Option<String>,
    pub(crate) dpop_jkt: Option<String>,
    pub(crate) dpop_proof: Option<String>,
    pub(crate) request: Option<String>,
    pub(crate) request_uri: Option<String>,
    pub(crate) claims: Option<String>,
    pub(crate) kc_action: Option<String>,
    pub(crate) ui_locales: Option<String>,
    pub(crate) max_age: Option<String>,
    pub(crate) prompt: Option<String>,
    pub(crate) nonce: Option<String>,
    pub(crate) state: Option<Arc<dyn StateProvider>>,
}

impl ClientContext {
    /// Create a context with the default [`FixedState`] provider.
    pub fn new(config: OAuthClientConfig) -> Self {
        Self {
            base_url: None,
            config,
            custom_parameters: BTreeMap::new(),
            code_challenge: None,
            code_challenge_method: None,
            code_verifier: None,
            client_session_state: None,
            client_session_host: None,
            dpop_jkt: None,
            dpop_proof: None,
            request: None,
            request_uri: None,
            claims: None,
            kc_action: None,
            ui_locales: None,
            max_age: None,
            prompt: None,
            nonce: None,
            state: Some(Arc::new(FixedState::default())),
        }
    }

    /// Clear every protocol parameter, keeping base URL, configuration and
    /// state provider.
    pub fn reset(&mut self) -> &mut Self {
        self.custom_parameters.clear();
        self.clear_pkce().clear_dpop();
        self.client_session_state = None;
        self.client_session_host = None;
        self.request = None;
        self.request_uri = None;
        self.claims = None;
        self.kc_action = None;
        self.ui_locales = None;
        self.max_age = None;
        self.prompt = None;
        self.nonce = None;
        self
    }

    pub fn base_url(&mut self, base_url: impl Into<String>) -> &mut Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Switch to a public client.
    pub fn client(&mut self, client_id: impl Into<String>) -> &mut Self {
        self.config.client(client_id);
        self
    }

    /// Switch to a confidential client.
    pub fn client_with_secret(
        &mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> &mut Self {
        self.config.client_with_secret(client_id, client_secret);
        self
    }

    /// Switch realm.
    pub fn realm(&mut self, realm: impl Into<String>) -> &mut Self {
        self.config.set_realm(realm);
        self
    }

    pub fn redirect_uri(&mut self, redirect_uri: impl Into<String>) -> &mut Self {
        self.config.set_redirect_uri(redirect_uri);
        self
    }

    /// Add a custom authorization parameter (last write wins).
    pub fn custom_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.custom_parameters.insert(name.into(), value.into());
        self
    }

    pub fn remove_custom_parameter(&mut self, name: &str) -> &mut Self {
        self.custom_parameters.remove(name);
        self
    }

    pub fn code_challenge(&mut self, challenge: impl Into<String>) -> &mut Self {
        self.code_challenge = Some(challenge.into());
        self
    }

    /// Set the challenge method; any string is accepted (e.g. [`PkceMethod`]).
    pub fn code_challenge_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.code_challenge_method = Some(method.into());
        self
    }

    pub fn code_verifier(&mut self, verifier: impl Into<String>) -> &mut Self {
        self.code_verifier = Some(verifier.into());
        self
    }

    /// Generate and set a full PKCE triple.
    pub fn generate_pkce(&mut self, method: PkceMethod) -> PkceParams {
        let params = DefaultPkceGenerator::new().generate(method);
        self.code_verifier = Some(params.code_verifier.clone());
        self.code_challenge = Some(params.code_challenge.clone());
        self.code_challenge_method = Some(method.into());
        params
    }

    pub fn clear_pkce(&mut self) -> &mut Self {
        self.code_challenge = None;
        self.code_challenge_method = None;
        self.code_verifier = None;
        self
    }

    pub fn client_session_state(&mut self, value: impl Into<String>) -> &mut Self {
        self.client_session_state = Some(value.into());
        self
    }

    pub fn client_session_host(&mut self, value: impl Into<String>) -> &mut Self {
        self.client_session_host = Some(value.into());
        self
    }

    /// JWK thumbprint sent as `dpop_jkt` on the authorization request.
    pub fn dpop_jkt(&mut self, jkt: impl Into<String>) -> &mut Self {
        self.dpop_jkt = Some(jkt.into());
        self
    }

    /// Proof sent as the `DPoP` header on token and user-info requests.
    pub fn dpop_proof(&mut self, proof: impl Into<String>) -> &mut Self {
        self.dpop_proof = Some(proof.into());
        self
    }

    pub fn clear_dpop(&mut self) -> &mut Self {
        self.dpop_jkt = None;
        self.dpop_proof = None;
        self
    }

    /// Request object (JWT) passed by value.
    pub fn request(&mut self, request: impl Into<String>) -> &mut Self {
        self.request = Some(request.into());
        self
    }

    /// Request object passed by reference.
    pub fn request_uri(&mut self, request_uri: impl Into<String>) -> &mut Self {
        self.request_uri = Some(request_uri.into());
        self
    }

    pub fn claims(&mut self, claims: impl Into<String>) -> &mut Self {
        self.claims = Some(claims.into());
        self
    }

    /// Application-initiated action (e.g. `UPDATE_PASSWORD`).
    pub fn kc_action(&mut self, action: impl Into<String>) -> &mut Self {
        self.kc_action = Some(action.into());
        self
    }

    pub fn ui_locales(&mut self, locales: impl Into<String>) -> &mut Self {
        self.ui_locales = Some(locales.into());
        self
    }

    /// Sent as is, so malformed values reach the provider.
    pub fn max_age(&mut self, seconds: impl Into<String>) -> &mut Self {
        self.max_age = Some(seconds.into());
        self
    }

    pub fn prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn nonce(&mut self, nonce: impl Into<String>) -> &mut Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Use a fixed state value.
    pub fn state(&mut self, value: impl Into<String>) -> &mut Self {
        self.state_provider(FixedState::new(value))
    }

    /// Use a fresh random state for every authorization URL.
    pub fn state_random(&mut self) -> &mut Self {
        self.state_provider(RandomState)
    }

    pub fn state_provider(&mut self, provider: impl StateProvider + 'static) -> &mut Self {
        self.state = Some(Arc::new(provider));
        self
    }

    /// Omit `state` from authorization URLs.
    pub fn clear_state(&mut self) -> &mut Self {
        self.state = None;
        self
    }

    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut OAuthClientConfig {
        &mut self.config
    }

    pub fn get_base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn get_redirect_uri(&self) -> Option<&str> {
        self.config.redirect_uri()
    }

    pub fn get_custom_parameters(&self) -> &BTreeMap<String, String> {
        &self.custom_parameters
    }

    pub fn get_code_challenge(&self) -> Option<&str> {
        self.code_challenge.as_deref()
    }

    pub fn get_code_challenge_method(&self) -> Option<&str> {
        self.code_challenge_method.as_deref()
    }

    pub fn get_code_verifier(&self) -> Option<&str> {
        self.code_verifier.as_deref()
    }

    pub fn get_client_session_state(&self) -> Option<&str> {
        self.client_session_state.as_deref()
    }

    pub fn get_client_session_host(&self) -> Option<&str> {
        self.client_session_host.as_deref()
    }

    pub fn get_dpop_jkt(&self) -> Option<&str> {
        self.dpop_jkt.as_deref()
    }

    pub fn get_dpop_proof(&self) -> Option<&str> {
        self.dpop_proof.as_deref()
    }

    pub fn get_request(&self) -> Option<&str> {
        self.request.as_deref()
    }

    pub fn get_request_uri(&self) -> Option<&str> {
        self.request_uri.as_deref()
    }

    pub fn get_claims(&self) -> Option<&str> {
        self.claims.as_deref()
    }

    pub fn get_kc_action(&self) -> Option<&str> {
        self.kc_action.as_deref()
    }

    pub fn get_ui_locales(&self) -> Option<&str> {
        self.ui_locales.as_deref()
    }

    pub fn get_max_age(&self) -> Option<&str> {
        self.max_age.as_deref()
    }

    pub fn get_prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn get_nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// Invoke the state provider.
    pub fn get_state(&self) -> Option<String> {
        self.state.as_ref().map(|provider| provider.state())
    }

    pub(crate) fn state_provider_handle(&self) -> Option<Arc<dyn StateProvider>> {
        self.state.clone()
    }

    /// Resolve endpoints for the configured base URL and realm.
    pub fn endpoints(&self) -> Result<Endpoints, OAuthError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| ConfigurationError::MissingRequired {
                field: "base_url".to_string(),
            })?;
        Endpoints::resolve(base_url, self.config.realm())
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .field("custom_parameters", &self.custom_parameters)
            .field("code_challenge", &self.code_challenge)
            .field("code_challenge_method", &self.code_challenge_method)
            .field("code_verifier", &self.code_verifier.as_ref().map(|_| "[REDACTED]"))
            .field("dpop_jkt", &self.dpop_jkt)
            .field("has_dpop_proof", &self.dpop_proof.is_some())
            .field("request_uri", &self.request_uri)
            .field("has_request", &self.request.is_some())
            .field("prompt", &self.prompt)
            .field("max_age", &self.max_age)
            .field("has_state_provider", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
