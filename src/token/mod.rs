//! Token-Bearing Side Requests
//!
//! Requests made with a token already issued:
//!
//! - **User-Info** (OIDC Core Section 5.3)
//! - **Token Revocation** (RFC 7009)
//! - **Token Introspection** (RFC 7662)

pub mod introspection;
#[cfg(feature = "jwt")]
pub mod jwt;
pub mod revocation;
pub mod userinfo;

pub use introspection::TokenIntrospectionRequest;
#[cfg(feature = "jwt")]
pub use jwt::decode_unverified;
pub use revocation::TokenRevocationRequest;
pub use userinfo::UserInfoRequest;
