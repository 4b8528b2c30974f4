//! Integration tests using WireMock
//!
//! Drive the real reqwest transport against a mock identity provider laid
//! out like a Keycloak realm.

mod authorization_url;
mod grant_requests;
mod login_flow;
mod side_requests;

pub use oauth_test_client::{
    oauth_client_config, MockSessionDriver, OAuthClient, ReqwestHttpTransport,
};
pub use wiremock::{MockServer, ResponseTemplate};

pub const REALM_PATH: &str = "/realms/test/protocol/openid-connect";
pub const REDIRECT_URI: &str = "http://localhost:8180/callback";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server, with a scripted browser.
pub fn client_for(server: &MockServer) -> OAuthClient<MockSessionDriver, ReqwestHttpTransport> {
    let config = oauth_client_config()
        .realm("test")
        .client_id("test-app")
        .redirect_uri(REDIRECT_URI)
        .build()
        .expect("Failed to build config");
    let transport = ReqwestHttpTransport::new().expect("Failed to build transport");

    let mut client = OAuthClient::with_transport(config, transport, MockSessionDriver::new());
    client.base_url(server.uri());
    client
}

pub fn token_response(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 300,
        "refresh_expires_in": 1800,
        "refresh_token": format!("{}-refresh", access_token),
        "scope": "openid profile",
        "session_state": "session-1"
    }))
}

pub fn error_response(status: u16, error: &str, description: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "error": error,
        "error_description": description
    }))
}

/// Form body of the n-th request the server received.
pub async fn form_of(server: &MockServer, index: usize) -> Vec<(String, String)> {
    let requests = server.received_requests().await.expect("Request recording disabled");
    url::form_urlencoded::parse(&requests[index].body)
        .into_owned()
        .collect()
}

pub fn value<'a>(form: &'a [(String, String)], name: &str) -> Option<&'a str> {
    form.iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
