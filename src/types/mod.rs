//! Test Client Types
//!
//! Configuration, request values and typed responses.

pub mod auth;
pub mod callback;
pub mod config;
pub mod introspection;
pub mod token;
pub mod userinfo;

pub use auth::*;
pub use callback::*;
pub use config::*;
pub use introspection::*;
pub use token::AccessTokenResponse;
pub use userinfo::*;
