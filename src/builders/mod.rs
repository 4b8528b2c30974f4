//! Builders
//!
//! Fluent builder patterns for client configuration.

pub mod config;

pub use config::{oauth_client_config, OAuthClientConfigBuilder};
