//! Endpoint Resolution
//!
//! Projects `(base_url, realm)` onto the provider's OIDC endpoints.

use url::Url;

use crate::error::{ConfigurationError, OAuthError};

/// Protocol endpoints of one realm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub issuer: Url,
    pub authorization: Url,
    pub token: Url,
    pub userinfo: Url,
    pub revocation: Url,
    pub introspection: Url,
    pub logout: Url,
    pub jwks: Url,
    pub device_authorization: Url,
    pub pushed_authorization_request: Url,
}

impl Endpoints {
    /// Resolve endpoints for `realm` below `base_url`.
    ///
    /// Pure: no network access, nothing cached.
    pub fn resolve(base_url: &str, realm: &str) -> Result<Self, OAuthError> {
        let base = Url::parse(base_url).map_err(|_| ConfigurationError::InvalidEndpoint {
            url: base_url.to_string(),
        })?;

        if base.cannot_be_a_base() {
            return Err(ConfigurationError::InvalidEndpoint {
                url: base_url.to_string(),
            }
            .into());
        }

        if realm.is_empty() {
            return Err(ConfigurationError::MissingRequired {
                field: "realm".to_string(),
            }
            .into());
        }

        let issuer = join(&base, &["realms", realm]);
        let protocol = |path: &[&str]| {
            let mut segments = vec!["realms", realm, "protocol", "openid-connect"];
            segments.extend_from_slice(path);
            join(&base, &segments)
        };

        Ok(Self {
            authorization: protocol(&["auth"]),
            token: protocol(&["token"]),
            userinfo: protocol(&["userinfo"]),
            revocation: protocol(&["revoke"]),
            introspection: protocol(&["token", "introspect"]),
            logout: protocol(&["logout"]),
            jwks: protocol(&["certs"]),
            device_authorization: protocol(&["auth", "device"]),
            pushed_authorization_request: protocol(&["ext", "par", "request"]),
            issuer,
        })
    }
}

fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
