//! Integration tests for authorization URL construction

use super::*;
use oauth_test_client::{compute_challenge, OAuthError, PkceMethod, Prompt};
use std::collections::HashMap;
use url::Url;

fn query_of(url: &str) -> HashMap<String, String> {
    Url::parse(url).unwrap().query_pairs().into_owned().collect()
}

#[tokio::test]
async fn test_every_parameter_round_trips() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);
    client
        .context_mut()
        .state("state with spaces & symbols")
        .nonce("n-0S6_WzA2Mj")
        .prompt(Prompt::Login)
        .max_age("120")
        .ui_locales("de-CH en")
        .request("eyJhbGciOiJSUzI1NiJ9.eyJpc3MiOiJ0ZXN0LWFwcCJ9.c2ln")
        .request_uri("urn:ietf:params:oauth:request_uri:6esc_11ACC5bwc014ltc14eY22c")
        .claims(r#"{"id_token":{"acr":{"essential":true}}}"#)
        .kc_action("UPDATE_PASSWORD")
        .code_challenge("E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM")
        .code_challenge_method("S256")
        .dpop_jkt("NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs")
        .client_session_state("client-session")
        .client_session_host("node-1.example.com")
        .custom_parameter("acr_values", "urn:mace:incommon:iap:silver");

    let built = client.authorization_url().build().unwrap();
    let params = query_of(&built.url);

    let expected = [
        ("response_type", "code"),
        ("client_id", "test-app"),
        ("redirect_uri", REDIRECT_URI),
        ("scope", "openid"),
        ("state", "state with spaces & symbols"),
        ("nonce", "n-0S6_WzA2Mj"),
        ("prompt", "login"),
        ("max_age", "120"),
        ("ui_locales", "de-CH en"),
        ("request", "eyJhbGciOiJSUzI1NiJ9.eyJpc3MiOiJ0ZXN0LWFwcCJ9.c2ln"),
        (
            "request_uri",
            "urn:ietf:params:oauth:request_uri:6esc_11ACC5bwc014ltc14eY22c",
        ),
        ("claims", r#"{"id_token":{"acr":{"essential":true}}}"#),
        ("kc_action", "UPDATE_PASSWORD"),
        ("code_challenge", "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"),
        ("code_challenge_method", "S256"),
        ("dpop_jkt", "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs"),
        ("client_session_state", "client-session"),
        ("client_session_host", "node-1.example.com"),
        ("acr_values", "urn:mace:incommon:iap:silver"),
    ];

    for (name, value) in expected {
        assert_eq!(params.get(name).map(String::as_str), Some(value), "{}", name);
    }
    assert_eq!(params.len(), expected.len());
}

#[tokio::test]
async fn test_generated_pkce_matches_verifier() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);
    let pkce = client.context_mut().generate_pkce(PkceMethod::S256);

    let params = query_of(&client.login_form_url().unwrap());
    assert_eq!(
        params.get("code_challenge"),
        Some(&compute_challenge(&pkce.code_verifier, PkceMethod::S256))
    );
}

#[tokio::test]
async fn test_random_state_differs_per_url() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);
    client.context_mut().state_random();

    let first = client.authorization_url().build().unwrap();
    let second = client.authorization_url().build().unwrap();

    assert_ne!(first.state, second.state);
    assert!(Url::parse(&first.url).is_ok());
    assert!(Url::parse(&second.url).is_ok());
}

#[tokio::test]
async fn test_realm_switch_changes_endpoints() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);

    let test_realm = client.login_form_url().unwrap();
    client.context_mut().realm("tenant-b");
    let other_realm = client.login_form_url().unwrap();

    assert!(test_realm.contains("/realms/test/protocol/openid-connect/auth?"));
    assert!(other_realm.contains("/realms/tenant-b/protocol/openid-connect/auth?"));
}

#[tokio::test]
async fn test_invalid_base_url() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);
    client.base_url("not a url");

    assert!(matches!(
        client.login_form_url(),
        Err(OAuthError::Configuration(_))
    ));
}
