//! Authorization Types
//!
//! Values used when building authorization-endpoint requests.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Result of authorization URL generation.
#[derive(Clone, Debug)]
pub struct AuthorizationUrl {
    /// The authorization URL to open in the browser.
    pub url: String,
    /// State produced for this request, if any.
    pub state: Option<String>,
}

impl std::fmt::Display for AuthorizationUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

/// Prompt behavior for authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// Do not display any authentication or consent UI.
    None,
    /// Force re-authentication.
    Login,
    /// Force consent screen.
    Consent,
    /// Force account selection.
    SelectAccount,
}

impl Prompt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Login => "login",
            Self::Consent => "consent",
            Self::SelectAccount => "select_account",
        }
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.as_str().to_string()
    }
}

/// PKCE challenge method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PkceMethod {
    /// SHA-256 hash.
    #[default]
    S256,
    /// Challenge equals the verifier.
    Plain,
}

impl PkceMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S256 => "S256",
            Self::Plain => "plain",
        }
    }
}

impl From<PkceMethod> for String {
    fn from(method: PkceMethod) -> Self {
        method.as_str().to_string()
    }
}

impl FromStr for PkceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S256" => Ok(Self::S256),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unsupported code challenge method: {}", other)),
        }
    }
}

/// PKCE parameters.
#[derive(Clone)]
pub struct PkceParams {
    /// Code verifier (keep secret).
    pub code_verifier: String,
    /// Code challenge (sent in authorization URL).
    pub code_challenge: String,
    /// Challenge method used.
    pub code_challenge_method: PkceMethod,
}

impl std::fmt::Debug for PkceParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceParams")
            .field("code_verifier", &"[REDACTED]")
            .field("code_challenge", &self.code_challenge)
            .field("code_challenge_method", &self.code_challenge_method)
            .finish()
    }
}
