//! Browser Session
//!
//! The client never drives a browser itself. A [`SessionDriver`] does the
//! navigation, and a [`LoginForm`] knows which fields a provider's login page
//! has.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{NavigationError, OAuthError};

/// Browser automation interface (for dependency injection).
#[async_trait]
pub trait SessionDriver: Send + Sync {
    /// Load a page.
    async fn navigate_to(&self, url: &str) -> Result<(), OAuthError>;

    /// URL of the page currently shown.
    async fn current_url(&self) -> Result<String, OAuthError>;

    /// Type a value into the element matching `selector`.
    async fn fill_field(&self, selector: &str, value: &str) -> Result<(), OAuthError>;

    /// Click the element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), OAuthError>;
}

/// Knows how to submit credentials on a provider's login page.
#[async_trait]
pub trait LoginForm: Send + Sync {
    async fn fill_login_form(
        &self,
        driver: &dyn SessionDriver,
        username: &str,
        password: &str,
    ) -> Result<(), OAuthError>;
}

/// Keycloak's default login theme.
#[derive(Clone, Debug)]
pub struct KeycloakLoginForm {
    pub username_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
}

impl Default for KeycloakLoginForm {
    fn default() -> Self {
        Self {
            username_selector: "#username".to_string(),
            password_selector: "#password".to_string(),
            submit_selector: "#kc-login".to_string(),
        }
    }
}

#[async_trait]
impl LoginForm for KeycloakLoginForm {
    async fn fill_login_form(
        &self,
        driver: &dyn SessionDriver,
        username: &str,
        password: &str,
    ) -> Result<(), OAuthError> {
        debug!(username, "Submitting login form");
        driver.fill_field(&self.username_selector, username).await?;
        driver.fill_field(&self.password_selector, password).await?;
        driver.click(&self.submit_selector).await
    }
}

/// Action recorded by [`MockSessionDriver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverAction {
    Navigate(String),
    Fill { selector: String, value: String },
    Click(String),
}

#[derive(Default)]
struct MockPage {
    current_url: Option<String>,
    click_targets: HashMap<String, String>,
    missing: HashSet<String>,
    unreachable: HashSet<String>,
    history: Vec<DriverAction>,
}

/// Mock session driver for testing.
///
/// Clicking a selector registered with [`on_click`](Self::on_click) moves
/// the session to the scripted URL, which is how a test fakes the provider
/// redirecting back after a login.
#[derive(Default)]
pub struct MockSessionDriver {
    page: Mutex<MockPage>,
}

impl MockSessionDriver {
    /// Create new mock driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Land on `url` when `selector` is clicked.
    pub fn on_click(&self, selector: impl Into<String>, url: impl Into<String>) -> &Self {
        self.page
            .lock()
            .unwrap()
            .click_targets
            .insert(selector.into(), url.into());
        self
    }

    /// Make `selector` absent from every page.
    pub fn without_element(&self, selector: impl Into<String>) -> &Self {
        self.page.lock().unwrap().missing.insert(selector.into());
        self
    }

    /// Fail navigation to `url`.
    pub fn unreachable(&self, url: impl Into<String>) -> &Self {
        self.page.lock().unwrap().unreachable.insert(url.into());
        self
    }

    /// Jump to `url` without recording a navigation.
    pub fn set_current_url(&self, url: impl Into<String>) -> &Self {
        self.page.lock().unwrap().current_url = Some(url.into());
        self
    }

    /// Get action history.
    pub fn get_actions(&self) -> Vec<DriverAction> {
        self.page.lock().unwrap().history.clone()
    }
}

#[async_trait]
impl SessionDriver for MockSessionDriver {
    async fn navigate_to(&self, url: &str) -> Result<(), OAuthError> {
        let mut page = self.page.lock().unwrap();
        page.history.push(DriverAction::Navigate(url.to_string()));

        if page.unreachable.contains(url) {
            return Err(NavigationError::Unreachable {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }
            .into());
        }

        page.current_url = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, OAuthError> {
        Ok(self
            .page
            .lock()
            .unwrap()
            .current_url
            .clone()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<(), OAuthError> {
        let mut page = self.page.lock().unwrap();
        if page.missing.contains(selector) {
            return Err(NavigationError::ElementNotFound {
                selector: selector.to_string(),
            }
            .into());
        }

        page.history.push(DriverAction::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), OAuthError> {
        let mut page = self.page.lock().unwrap();
        if page.missing.contains(selector) {
            return Err(NavigationError::ElementNotFound {
                selector: selector.to_string(),
            }
            .into());
        }

        page.history.push(DriverAction::Click(selector.to_string()));
        if let Some(target) = page.click_targets.get(selector).cloned() {
            page.current_url = Some(target);
        }
        Ok(())
    }
}
