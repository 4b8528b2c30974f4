//! Test Client Flows
//!
//! Authorization-endpoint and token-endpoint interactions:
//!
//! - **Authorization URL** (RFC 6749 Section 4.1.1, RFC 7636, RFC 9101)
//! - **Interactive Login**: browser round trip back to the redirect URI
//! - **Authorization Code Grant** (RFC 6749 Section 4.1.3)
//! - **Password Grant** (RFC 6749 Section 4.3)
//! - **Client Credentials Grant** (RFC 6749 Section 4.4)
//! - **Refresh** (RFC 6749 Section 6)

pub mod authorization_code;
pub mod authorization_url;
pub mod client_credentials;
pub mod login;
pub mod password;
pub mod refresh;
pub(crate) mod token_request;

pub use authorization_code::AccessTokenRequest;
pub use authorization_url::AuthorizationUrlBuilder;
pub use client_credentials::ClientCredentialsGrantRequest;
pub use login::{LoginFlow, LoginState};
pub use password::PasswordGrantRequest;
pub use refresh::RefreshRequest;
