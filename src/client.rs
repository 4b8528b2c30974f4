//! Test Client
//!
//! High-level client combining the context, the request builders and the
//! interactive login.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::{
    ClientContext, Endpoints, HttpTransport, KeycloakLoginForm, LoginForm, ReqwestHttpTransport,
    SessionDriver,
};
use crate::error::{ConfigurationError, OAuthError};
use crate::flows::{
    AccessTokenRequest, AuthorizationUrlBuilder, ClientCredentialsGrantRequest, LoginFlow,
    PasswordGrantRequest, RefreshRequest,
};
use crate::flows::login::read_redirect;
use crate::token::{TokenIntrospectionRequest, TokenRevocationRequest, UserInfoRequest};
use crate::types::{
    AccessTokenResponse, AuthorizationEndpointResponse, OAuthClientConfig,
    TokenIntrospectionResponse, TokenRevocationResponse, UserInfoResponse,
};

/// OAuth2/OIDC test client for one provider.
///
/// Owns its HTTP executor and session driver for its whole lifetime. All
/// operations are sequential; mutation of the context needs `&mut self`.
pub struct OAuthClient<D: SessionDriver, T: HttpTransport = ReqwestHttpTransport> {
    context: ClientContext,
    transport: Arc<T>,
    driver: D,
    login_form: Box<dyn LoginForm>,
    login: Option<LoginFlow>,
}

impl<D: SessionDriver> OAuthClient<D, ReqwestHttpTransport> {
    /// Create a client with the default reqwest transport and configuration.
    pub fn new(base_url: impl Into<String>, driver: D) -> Result<Self, OAuthError> {
        let transport = ReqwestHttpTransport::new()?;
        let mut client = Self::with_transport(OAuthClientConfig::new(), transport, driver);
        client.context.base_url(base_url);
        Ok(client)
    }
}

impl<D: SessionDriver, T: HttpTransport> OAuthClient<D, T> {
    /// Create a client with custom components.
    pub fn with_transport(config: OAuthClientConfig, transport: T, driver: D) -> Self {
        Self {
            context: ClientContext::new(config),
            transport: Arc::new(transport),
            driver,
            login_form: Box::new(KeycloakLoginForm::default()),
            login: None,
        }
    }

    /// Use another provider's login page.
    pub fn with_login_form(mut self, login_form: impl LoginForm + 'static) -> Self {
        self.login_form = Box::new(login_form);
        self
    }

    /// Replace the session driver.
    pub fn set_driver(&mut self, driver: D) -> &mut Self {
        self.driver = driver;
        self.login = None;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ClientContext {
        &mut self.context
    }

    pub fn config(&self) -> &OAuthClientConfig {
        self.context.config()
    }

    pub fn config_mut(&mut self) -> &mut OAuthClientConfig {
        self.context.config_mut()
    }

    pub fn base_url(&mut self, base_url: impl Into<String>) -> &mut ClientContext {
        self.context.base_url(base_url)
    }

    pub fn client(&mut self, client_id: impl Into<String>) -> &mut ClientContext {
        self.context.client(client_id)
    }

    pub fn client_with_secret(
        &mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> &mut ClientContext {
        self.context.client_with_secret(client_id, client_secret)
    }

    pub fn endpoints(&self) -> Result<Endpoints, OAuthError> {
        self.context.endpoints()
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.context.get_redirect_uri()
    }

    /// Ask the state provider for a value.
    pub fn state(&self) -> Option<String> {
        self.context.get_state()
    }

    // Interactive login

    pub fn authorization_url(&self) -> AuthorizationUrlBuilder {
        AuthorizationUrlBuilder::new(&self.context)
    }

    pub fn login_form_url(&self) -> Result<String, OAuthError> {
        Ok(self.authorization_url().build()?.url)
    }

    /// Navigate the session to a freshly built authorization URL.
    #[instrument(skip(self))]
    pub async fn open_login_form(&mut self) -> Result<(), OAuthError> {
        let authorization_url = self.authorization_url().build()?;
        let redirect_uri = self.redirect_uri().map(String::from).ok_or_else(|| {
            ConfigurationError::MissingRequired {
                field: "redirect_uri".to_string(),
            }
        })?;

        let mut flow = LoginFlow::new(redirect_uri);
        let result = flow.open(&self.driver, &authorization_url).await;
        self.login = Some(flow);
        result
    }

    /// Submit credentials on the page the session currently shows.
    pub async fn fill_login_form(&self, username: &str, password: &str) -> Result<(), OAuthError> {
        self.login_form
            .fill_login_form(&self.driver, username, password)
            .await
    }

    /// Open the login form, submit credentials and parse the redirect.
    #[instrument(skip(self, password))]
    pub async fn do_login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<AuthorizationEndpointResponse, OAuthError> {
        self.open_login_form().await?;
        self.fill_login_form(username, password).await?;
        self.parse_login_response().await
    }

    /// Parse the redirect the session currently shows.
    ///
    /// Completes the login opened by [`open_login_form`](Self::open_login_form),
    /// including its redirect URI and `state` checks. Without a pending login,
    /// which suits sessions where the provider skipped the login page (SSO),
    /// only the redirect URI is checked.
    pub async fn parse_login_response(&mut self) -> Result<AuthorizationEndpointResponse, OAuthError> {
        if let Some(mut flow) = self.login.take() {
            return flow.complete(&self.driver).await;
        }

        let redirect_uri = self.redirect_uri().ok_or_else(|| ConfigurationError::MissingRequired {
            field: "redirect_uri".to_string(),
        })?;
        debug!(redirect_uri = %redirect_uri, "Parsing redirect without a pending login");
        read_redirect(&self.driver, redirect_uri).await
    }

    // Grants

    pub fn access_token_request(&self, code: impl Into<String>) -> AccessTokenRequest<T> {
        AccessTokenRequest::new(&self.context, Arc::clone(&self.transport), code)
    }

    pub async fn do_access_token_request(
        &self,
        code: impl Into<String>,
    ) -> Result<AccessTokenResponse, OAuthError> {
        self.access_token_request(code).send().await
    }

    pub fn password_grant_request(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> PasswordGrantRequest<T> {
        PasswordGrantRequest::new(&self.context, Arc::clone(&self.transport), username, password)
    }

    pub async fn do_password_grant_request(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AccessTokenResponse, OAuthError> {
        self.password_grant_request(username, password).send().await
    }

    pub fn client_credentials_grant_request(&self) -> ClientCredentialsGrantRequest<T> {
        ClientCredentialsGrantRequest::new(&self.context, Arc::clone(&self.transport))
    }

    pub async fn do_client_credentials_grant_request(
        &self,
    ) -> Result<AccessTokenResponse, OAuthError> {
        self.client_credentials_grant_request().send().await
    }

    pub fn refresh_request(&self, refresh_token: impl Into<String>) -> RefreshRequest<T> {
        RefreshRequest::new(&self.context, Arc::clone(&self.transport), refresh_token)
    }

    pub async fn do_refresh_token_request(
        &self,
        refresh_token: impl Into<String>,
    ) -> Result<AccessTokenResponse, OAuthError> {
        self.refresh_request(refresh_token).send().await
    }

    // Side requests

    pub fn user_info_request(&self, access_token: impl Into<String>) -> UserInfoRequest<T> {
        UserInfoRequest::new(&self.context, Arc::clone(&self.transport), access_token)
    }

    pub async fn do_user_info_request(
        &self,
        access_token: impl Into<String>,
    ) -> Result<UserInfoResponse, OAuthError> {
        self.user_info_request(access_token).send().await
    }

    pub fn token_revocation_request(&self, token: impl Into<String>) -> TokenRevocationRequest<T> {
        TokenRevocationRequest::new(&self.context, Arc::clone(&self.transport), token)
    }

    pub async fn do_token_revoke(
        &self,
        token: impl Into<String>,
    ) -> Result<TokenRevocationResponse, OAuthError> {
        self.token_revocation_request(token).send().await
    }

    pub fn token_introspection_request(
        &self,
        token: impl Into<String>,
    ) -> TokenIntrospectionRequest<T> {
        TokenIntrospectionRequest::new(&self.context, Arc::clone(&self.transport), token)
    }

    pub async fn do_introspection_request(
        &self,
        token: impl Into<String>,
    ) -> Result<TokenIntrospectionResponse, OAuthError> {
        self.token_introspection_request(token).send().await
    }
}

/// Create a client with the default reqwest transport.
pub fn oauth_client<D: SessionDriver>(
    base_url: impl Into<String>,
    driver: D,
) -> Result<OAuthClient<D>, OAuthError> {
    OAuthClient::new(base_url, driver)
}
