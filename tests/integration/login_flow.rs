//! Integration tests for the interactive login followed by a code exchange

use super::*;
use oauth_test_client::{NavigationError, OAuthError, PkceMethod};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_login_and_code_exchange() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("{}/token", REALM_PATH)))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .respond_with(token_response("code-token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.context_mut().state("s1");
    let pkce = client.context_mut().generate_pkce(PkceMethod::S256);
    client
        .driver()
        .on_click("#kc-login", format!("{}?code=abc123&state=s1&session_state=ss", REDIRECT_URI));

    let login = client.do_login("alice", "password").await.unwrap();
    assert_eq!(login.code.as_deref(), Some("abc123"));
    assert_eq!(login.state.as_deref(), Some("s1"));
    assert_eq!(login.session_state.as_deref(), Some("ss"));
    assert!(login.error.is_none());

    let tokens = client
        .do_access_token_request(login.code.unwrap())
        .await
        .unwrap();
    assert_eq!(tokens.access_token.as_deref(), Some("code-token"));

    let form = form_of(&mock_server, 0).await;
    assert_eq!(value(&form, "code_verifier"), Some(pkce.code_verifier.as_str()));
    assert_eq!(value(&form, "redirect_uri"), Some(REDIRECT_URI));
}

#[tokio::test]
async fn test_login_denied_by_provider() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);
    client.driver().on_click(
        "#kc-login",
        format!("{}?error=access_denied&error_description=Consent+denied", REDIRECT_URI),
    );

    let login = client.do_login("alice", "password").await.unwrap();
    assert!(login.code.is_none());
    let error = login.protocol_error().unwrap();
    assert_eq!(error.error, "access_denied");
    assert_eq!(error.error_description.as_deref(), Some("Consent denied"));
}

#[tokio::test]
async fn test_login_never_reaches_redirect() {
    let mock_server = setup_mock_server().await;
    let mut client = client_for(&mock_server);

    let result = client.do_login("alice", "wrong-password").await;
    assert!(matches!(
        result,
        Err(OAuthError::Navigation(NavigationError::UnexpectedPage { .. }))
    ));
}
