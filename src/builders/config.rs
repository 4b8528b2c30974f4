//! Configuration Builder
//!
//! Fluent builder for test client configuration.

use url::Url;

use crate::error::{ConfigurationError, OAuthError};
use crate::types::{ClientAuthMethod, OAuthClientConfig, UserInfoTransport};

/// Client configuration builder.
#[derive(Default)]
pub struct OAuthClientConfigBuilder {
    realm: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    auth_method: Option<ClientAuthMethod>,
    redirect_uri: Option<String>,
    scope: Option<Option<String>>,
    response_type: Option<String>,
    response_mode: Option<String>,
    userinfo_transport: Option<UserInfoTransport>,
}

impl OAuthClientConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set realm.
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Set client ID.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set client authentication method.
    pub fn auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set redirect URI.
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Set scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(Some(scope.into()));
        self
    }

    /// Do not send a scope.
    pub fn no_scope(mut self) -> Self {
        self.scope = Some(None);
        self
    }

    /// Set response type.
    pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    /// Set response mode.
    pub fn response_mode(mut self, response_mode: impl Into<String>) -> Self {
        self.response_mode = Some(response_mode.into());
        self
    }

    /// Set default user-info transport.
    pub fn userinfo_transport(mut self, transport: UserInfoTransport) -> Self {
        self.userinfo_transport = Some(transport);
        self
    }

    /// Build configuration.
    pub fn build(self) -> Result<OAuthClientConfig, OAuthError> {
        let mut config = OAuthClientConfig::new();

        if let Some(realm) = self.realm {
            if realm.trim().is_empty() {
                return Err(ConfigurationError::MissingRequired {
                    field: "realm".to_string(),
                }
                .into());
            }
            config.set_realm(realm);
        }

        if let Some(client_id) = self.client_id {
            if client_id.trim().is_empty() {
                return Err(ConfigurationError::MissingRequired {
                    field: "client_id".to_string(),
                }
                .into());
            }
            match self.client_secret {
                Some(secret) => config.client_with_secret(client_id, secret),
                None => config.client(client_id),
            };
        } else if self.client_secret.is_some() {
            return Err(ConfigurationError::InvalidConfig {
                message: "client_secret requires client_id".to_string(),
            }
            .into());
        }

        if let Some(redirect_uri) = self.redirect_uri {
            Url::parse(&redirect_uri).map_err(|_| ConfigurationError::InvalidEndpoint {
                url: redirect_uri.clone(),
            })?;
            config.set_redirect_uri(redirect_uri);
        }

        if let Some(method) = self.auth_method {
            config.set_auth_method(method);
        }
        if let Some(scope) = self.scope {
            config.set_scope(scope);
        }
        if let Some(response_type) = self.response_type {
            config.set_response_type(response_type);
        }
        if let Some(response_mode) = self.response_mode {
            config.set_response_mode(Some(response_mode));
        }
        if let Some(transport) = self.userinfo_transport {
            config.set_userinfo_transport(transport);
        }

        Ok(config)
    }
}

/// Create a new configuration builder.
pub fn oauth_client_config() -> OAuthClientConfigBuilder {
    OAuthClientConfigBuilder::new()
}
