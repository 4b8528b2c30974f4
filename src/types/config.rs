//! Configuration Types
//!
//! Client identity configuration shared by every request a test client makes.

use secrecy::SecretString;
use serde::Deserialize;

/// Default realm.
pub const DEFAULT_REALM: &str = "test";
/// Default client ID.
pub const DEFAULT_CLIENT_ID: &str = "test-app";
/// Default scope.
pub const DEFAULT_SCOPE: &str = "openid";
/// Default response type.
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

/// Client identity configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OAuthClientConfig {
    realm: String,
    client_id: String,
    client_secret: Option<SecretString>,
    auth_method: Option<ClientAuthMethod>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    response_type: String,
    response_mode: Option<String>,
    userinfo_transport: UserInfoTransport,
}

impl Default for OAuthClientConfig {
    fn default() -> Self {
        Self {
            realm: DEFAULT_REALM.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: None,
            auth_method: None,
            redirect_uri: None,
            scope: Some(DEFAULT_SCOPE.to_string()),
            response_type: DEFAULT_RESPONSE_TYPE.to_string(),
            response_mode: None,
            userinfo_transport: UserInfoTransport::default(),
        }
    }
}

impl OAuthClientConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a public client (no secret).
    pub fn client(&mut self, client_id: impl Into<String>) -> &mut Self {
        self.client_id = client_id.into();
        self.client_secret = None;
        self
    }

    /// Use a confidential client.
    pub fn client_with_secret(
        &mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> &mut Self {
        self.client_id = client_id.into();
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    /// Set realm.
    pub fn set_realm(&mut self, realm: impl Into<String>) -> &mut Self {
        self.realm = realm.into();
        self
    }

    /// Set redirect URI.
    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) -> &mut Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Set scope; `None` omits it.
    pub fn set_scope(&mut self, scope: Option<String>) -> &mut Self {
        self.scope = scope;
        self
    }

    /// Set response type.
    pub fn set_response_type(&mut self, response_type: impl Into<String>) -> &mut Self {
        self.response_type = response_type.into();
        self
    }

    /// Set response mode; `None` omits it.
    pub fn set_response_mode(&mut self, response_mode: Option<String>) -> &mut Self {
        self.response_mode = response_mode;
        self
    }

    /// Force a client authentication method.
    pub fn set_auth_method(&mut self, method: ClientAuthMethod) -> &mut Self {
        self.auth_method = Some(method);
        self
    }

    /// Set default user-info transport.
    pub fn set_userinfo_transport(&mut self, transport: UserInfoTransport) -> &mut Self {
        self.userinfo_transport = transport;
        self
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> Option<&SecretString> {
        self.client_secret.as_ref()
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn response_type(&self) -> &str {
        &self.response_type
    }

    pub fn response_mode(&self) -> Option<&str> {
        self.response_mode.as_deref()
    }

    pub fn userinfo_transport(&self) -> UserInfoTransport {
        self.userinfo_transport
    }

    /// Authentication method used at the token endpoint.
    ///
    /// An explicit method wins; otherwise confidential clients use HTTP Basic
    /// and public clients send only their `client_id`.
    pub fn effective_auth_method(&self) -> ClientAuthMethod {
        match (self.auth_method, &self.client_secret) {
            (Some(method), _) => method,
            (None, Some(_)) => ClientAuthMethod::ClientSecretBasic,
            (None, None) => ClientAuthMethod::None,
        }
    }
}

impl std::fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("auth_method", &self.auth_method)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("response_type", &self.response_type)
            .field("response_mode", &self.response_mode)
            .field("userinfo_transport", &self.userinfo_transport)
            .finish()
    }
}

/// Client authentication method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// client_id and client_secret in request body.
    ClientSecretPost,
    /// HTTP Basic Authentication header.
    ClientSecretBasic,
    /// No client authentication (public client).
    None,
}

/// How the access token reaches the user-info endpoint (RFC 6750 Section 2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInfoTransport {
    /// `Authorization` request header.
    #[default]
    AuthorizationHeader,
    /// `access_token` in a form-encoded POST body.
    FormBody,
    /// `access_token` query parameter on a GET.
    QueryParameter,
}

/// Grant type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantType {
    AuthorizationCode,
    Password,
    ClientCredentials,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
            Self::RefreshToken => "refresh_token",
        }
    }
}
