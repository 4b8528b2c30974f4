//! Integration tests for the token endpoint grants

use super::*;
use base64::Engine;
use oauth_test_client::{ClientAuthMethod, OAuthError};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_password_grant_integration_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(token_response("password-token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .do_password_grant_request("alice", "p@ss word")
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.access_token.as_deref(), Some("password-token"));
    assert_eq!(response.refresh_token.as_deref(), Some("password-token-refresh"));
    assert_eq!(response.expires_in, Some(300));
    assert_eq!(response.session_state.as_deref(), Some("session-1"));

    let form = form_of(&mock_server, 0).await;
    assert_eq!(value(&form, "username"), Some("alice"));
    assert_eq!(value(&form, "password"), Some("p@ss word"));
    assert_eq!(value(&form, "client_id"), Some("test-app"));
    assert_eq!(value(&form, "scope"), Some("openid"));
}

#[tokio::test]
async fn test_invalid_grant_is_returned_as_data() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .respond_with(error_response(400, "invalid_grant", "Code not valid"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.do_access_token_request("stale-code").await.unwrap();

    assert_eq!(response.status_code, 400);
    assert!(!response.is_success());
    assert_eq!(response.error(), Some("invalid_grant"));
    assert_eq!(response.error_description(), Some("Code not valid"));
    assert!(response.access_token.is_none());
}

#[tokio::test]
async fn test_refresh_sends_token_and_credentials() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .respond_with(token_response("refreshed"))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client
        .client_with_secret("app", "secret")
        .config_mut()
        .set_auth_method(ClientAuthMethod::ClientSecretPost);

    let response = client.do_refresh_token_request("r1").await.unwrap();
    assert_eq!(response.access_token.as_deref(), Some("refreshed"));

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.starts_with("grant_type=refresh_token&refresh_token=r1"));
    assert!(body.contains("client_id=app"));
    assert!(body.contains("client_secret=secret"));
}

#[tokio::test]
async fn test_client_credentials_with_basic_auth() {
    let mock_server = setup_mock_server().await;

    let credentials = base64::engine::general_purpose::STANDARD.encode("service:secret");
    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .and(header("authorization", format!("Basic {}", credentials).as_str()))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(token_response("service-token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.client_with_secret("service", "secret");

    let response = client.do_client_credentials_grant_request().await.unwrap();
    assert_eq!(response.access_token.as_deref(), Some("service-token"));
    assert_eq!(response.scopes(), vec!["openid", "profile"]);
}

#[tokio::test]
async fn test_dpop_proof_header() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .and(header("dpop", "proof.jwt.value"))
        .respond_with(token_response("bound-token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.context_mut().dpop_proof("proof.jwt.value");

    let response = client.do_password_grant_request("alice", "password").await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_server_error_with_html_body() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.do_password_grant_request("alice", "password").await.unwrap();

    assert_eq!(response.status_code, 503);
    assert!(response.protocol_error.is_none());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let mock_server = setup_mock_server().await;
    let client = client_for(&mock_server);
    drop(mock_server);

    let result = client.do_password_grant_request("alice", "password").await;
    assert!(matches!(result, Err(OAuthError::Transport(_))));
}
