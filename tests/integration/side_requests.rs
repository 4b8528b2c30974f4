//! Integration tests for user-info, revocation and introspection

use super::*;
use oauth_test_client::{TokenTypeHint, UserInfoTransport};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::Mock;

fn user_info_body() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "sub": "f4a1",
        "preferred_username": "alice",
        "email": "alice@example.com",
        "email_verified": true
    }))
}

#[tokio::test]
async fn test_user_info_bearer_header() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/userinfo", REALM_PATH)))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(user_info_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.do_user_info_request("access-1").await.unwrap();

    assert!(response.is_success());
    assert_eq!(response.user_info.sub.as_deref(), Some("f4a1"));
    assert_eq!(response.user_info.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn test_user_info_form_body_and_query() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/userinfo", REALM_PATH)))
        .and(body_string_contains("access_token=access-1"))
        .respond_with(user_info_body())
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/userinfo", REALM_PATH)))
        .and(query_param("access_token", "access-2"))
        .respond_with(user_info_body())
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let posted = client
        .user_info_request("access-1")
        .transport(UserInfoTransport::FormBody)
        .send()
        .await
        .unwrap();
    let queried = client
        .user_info_request("access-2")
        .transport(UserInfoTransport::QueryParameter)
        .send()
        .await
        .unwrap();

    assert!(posted.is_success());
    assert!(queried.is_success());
}

#[tokio::test]
async fn test_user_info_invalid_token_challenge() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/userinfo", REALM_PATH)))
        .respond_with(ResponseTemplate::new(401).insert_header(
            "WWW-Authenticate",
            r#"Bearer realm="test", error="invalid_token", error_description="Token verification failed""#,
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.do_user_info_request("expired").await.unwrap();

    assert_eq!(response.status_code, 401);
    let error = response.protocol_error.unwrap();
    assert_eq!(error.error, "invalid_token");
    assert_eq!(error.error_description.as_deref(), Some("Token verification failed"));
}

#[tokio::test]
async fn test_revocation() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/revoke", REALM_PATH)))
        .and(body_string_contains("token_type_hint=refresh_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .token_revocation_request("refresh-1")
        .token_type_hint(TokenTypeHint::RefreshToken)
        .send()
        .await
        .unwrap();

    assert!(response.is_success());
    let form = form_of(&mock_server, 0).await;
    assert_eq!(value(&form, "token"), Some("refresh-1"));
    assert_eq!(value(&form, "client_id"), Some("test-app"));
}

#[tokio::test]
async fn test_introspection() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token/introspect", REALM_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "active": true,
            "client_id": "test-app",
            "username": "alice",
            "scope": "openid email"
        })))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.client_with_secret("resource-server", "secret");

    let response = client.do_introspection_request("access-1").await.unwrap();
    assert!(response.is_active());
    assert_eq!(response.introspection.scopes(), vec!["openid", "email"]);
}
