//! Interactive Login
//!
//! Drives a [`SessionDriver`] to the authorization endpoint and captures the
//! redirect back to the client.

use tracing::{debug, warn};
use url::Url;

use crate::core::SessionDriver;
use crate::error::{AuthorizationError, ConfigurationError, NavigationError, OAuthError};
use crate::types::{AuthorizationEndpointResponse, AuthorizationUrl};

/// Login flow state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginState {
    /// Nothing opened yet.
    Idle,
    /// Browser shows the provider's pages.
    AwaitingUserInput,
    /// Redirect captured without an error.
    Completed,
    /// Redirect carried an error, or the flow could not continue.
    Failed,
}

impl LoginState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingUserInput => "awaiting_user_input",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One interactive login.
///
/// `open` then `complete`, once each. Credential entry between the two is
/// left to a [`LoginForm`](crate::core::LoginForm).
#[derive(Debug)]
pub struct LoginFlow {
    redirect_uri: String,
    expected_state: Option<String>,
    status: LoginState,
    response: Option<AuthorizationEndpointResponse>,
}

impl LoginFlow {
    /// Create a flow that completes on a redirect to `redirect_uri`.
    pub fn new(redirect_uri: impl Into<String>) -> Self {
        Self {
            redirect_uri: redirect_uri.into(),
            expected_state: None,
            status: LoginState::Idle,
            response: None,
        }
    }

    pub fn status(&self) -> LoginState {
        self.status
    }

    /// The parsed redirect, once the flow has finished.
    pub fn response(&self) -> Option<&AuthorizationEndpointResponse> {
        self.response.as_ref()
    }

    /// Navigate to the authorization URL.
    pub async fn open(
        &mut self,
        driver: &dyn SessionDriver,
        authorization_url: &AuthorizationUrl,
    ) -> Result<(), OAuthError> {
        self.require(LoginState::Idle, "open")?;

        debug!(url = %authorization_url.url, "Opening login form");
        if let Err(e) = driver.navigate_to(&authorization_url.url).await {
            self.status = LoginState::Failed;
            return Err(e);
        }

        self.expected_state = authorization_url.state.clone();
        self.status = LoginState::AwaitingUserInput;
        Ok(())
    }

    /// Capture the redirect the browser currently shows.
    ///
    /// A provider error in the redirect is returned as data with the flow
    /// `Failed`. A browser not on the redirect URI, or a successful redirect
    /// echoing a foreign `state`, is an error.
    pub async fn complete(
        &mut self,
        driver: &dyn SessionDriver,
    ) -> Result<AuthorizationEndpointResponse, OAuthError> {
        self.require(LoginState::AwaitingUserInput, "complete")?;

        let result = self.capture(driver).await;
        match &result {
            Ok(response) if response.is_error() => {
                debug!(error = ?response.error, "Login redirect carried an error");
                self.status = LoginState::Failed;
            }
            Ok(_) => self.status = LoginState::Completed,
            Err(e) => {
                warn!(code = e.error_code(), error = %e, "Login flow failed");
                self.status = LoginState::Failed;
            }
        }

        if let Ok(response) = &result {
            self.response = Some(response.clone());
        }
        result
    }

    async fn capture(
        &self,
        driver: &dyn SessionDriver,
    ) -> Result<AuthorizationEndpointResponse, OAuthError> {
        let response = read_redirect(driver, &self.redirect_uri).await?;

        if !response.is_error() {
            if let Some(expected) = &self.expected_state {
                if response.state.as_ref() != Some(expected) {
                    return Err(AuthorizationError::StateMismatch {
                        expected: Some(expected.clone()),
                        received: response.state.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(response)
    }

    fn require(&self, state: LoginState, action: &'static str) -> Result<(), OAuthError> {
        if self.status != state {
            return Err(NavigationError::InvalidState {
                state: self.status.as_str(),
                action,
            }
            .into());
        }
        Ok(())
    }
}

/// Parse the page the session shows as a redirect to `redirect_uri`.
///
/// Scheme, host, port and path must match exactly; query and fragment carry
/// the response. Any other page is [`NavigationError::UnexpectedPage`].
pub(crate) async fn read_redirect(
    driver: &dyn SessionDriver,
    redirect_uri: &str,
) -> Result<AuthorizationEndpointResponse, OAuthError> {
    let expected = Url::parse(redirect_uri).map_err(|_| ConfigurationError::InvalidEndpoint {
        url: redirect_uri.to_string(),
    })?;

    let current = driver.current_url().await?;
    let url = match Url::parse(&current) {
        Ok(url) if is_redirect_target(&expected, &url) => url,
        _ => {
            return Err(NavigationError::UnexpectedPage {
                expected: redirect_uri.to_string(),
                actual: current,
            }
            .into())
        }
    };

    Ok(AuthorizationEndpointResponse::from_url(&url))
}

fn is_redirect_target(expected: &Url, actual: &Url) -> bool {
    expected.scheme() == actual.scheme()
        && expected.host_str() == actual.host_str()
        && expected.port_or_known_default() == actual.port_or_known_default()
        && expected.path() == actual.path()
}
