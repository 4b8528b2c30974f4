//! OAuth2/OIDC Test Client
//!
//! A programmatic client for exercising an identity provider's endpoints from
//! automated tests. Provider errors come back as data so tests can assert on
//! them; only configuration, transport and navigation failures are errors.
//!
//! # Features
//!
//! - Authorization URLs with PKCE (RFC 7636), request objects (RFC 9101),
//!   DPoP (RFC 9449), claims, prompt and UI-locale hints
//! - Interactive login through a pluggable browser session
//! - Authorization Code, Password, Client Credentials and Refresh grants
//! - User-Info, Token Revocation (RFC 7009) and Introspection (RFC 7662)
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth_test_client::{oauth_client, PkceMethod};
//!
//! #[tokio::test]
//! async fn login_with_pkce() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = oauth_client("http://localhost:8080", my_webdriver_session())?;
//!     client
//!         .client("test-app")
//!         .redirect_uri("http://localhost:8180/callback")
//!         .state_random();
//!     client.context_mut().generate_pkce(PkceMethod::S256);
//!
//!     let login = client.do_login("alice", "password").await?;
//!     let tokens = client.do_access_token_request(login.code.unwrap()).await?;
//!     assert!(tokens.is_success());
//!
//!     let refreshed = client
//!         .do_refresh_token_request(tokens.refresh_token.unwrap())
//!         .await?;
//!     assert_eq!(refreshed.status_code, 200);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, request values and typed responses
//! - `error`: error hierarchy and the provider-error value
//! - `core`: context, endpoints, HTTP transport, session driver, PKCE, state
//! - `flows`: authorization URL, interactive login and grant requests
//! - `token`: user-info, revocation and introspection requests
//! - `builders`: fluent configuration builder
//! - `client`: high-level client combining all of the above

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod flows;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{oauth_client, OAuthClient};

// Re-export builders
pub use builders::{oauth_client_config, OAuthClientConfigBuilder};

// Re-export errors
pub use error::{
    AuthorizationError, ConfigurationError, NavigationError, OAuthError, OAuthResult,
    ProtocolError, ResponseError, TransportError,
};

// Re-export types
pub use types::{
    // Config
    ClientAuthMethod, GrantType, OAuthClientConfig, UserInfoTransport,
    // Auth
    AuthorizationUrl, PkceMethod, PkceParams, Prompt,
    // Callback
    AuthorizationEndpointResponse,
    // Token
    AccessTokenResponse,
    // User-Info
    UserInfo, UserInfoResponse,
    // Introspection
    IntrospectionResponse, TokenIntrospectionResponse, TokenRevocationResponse, TokenTypeHint,
};

// Re-export core components
pub use core::{
    // Context
    ClientContext, Endpoints,
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
    // Session
    DriverAction, KeycloakLoginForm, LoginForm, MockSessionDriver, SessionDriver,
    // State
    FixedState, RandomState, StateProvider, TimestampState,
    // PKCE
    compute_challenge, DefaultPkceGenerator, PkceGenerator,
};

// Re-export flows
pub use flows::{
    AccessTokenRequest, AuthorizationUrlBuilder, ClientCredentialsGrantRequest, LoginFlow,
    LoginState, PasswordGrantRequest, RefreshRequest,
};

// Re-export side requests
pub use token::{TokenIntrospectionRequest, TokenRevocationRequest, UserInfoRequest};

#[cfg(feature = "jwt")]
pub use token::decode_unverified;
