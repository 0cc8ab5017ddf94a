use super::*;
use crate::net::client::{ApiClient, RequestOptions};
use crate::net::testing::{RecordingNavigator, ScriptedTransport, reply};
use crate::net::types::Method;
use serde_json::json;

fn redirecting_client(
    transport: &ScriptedTransport,
    navigator: &RecordingNavigator,
) -> ApiClient<ScriptedTransport> {
    ApiClient::builder(ApiConfig::default(), transport.clone())
        .response_interceptor(UnauthorizedRedirect::new(navigator.clone(), "/login"))
        .build()
}

// =============================================================
// UnauthorizedRedirect
// =============================================================

#[tokio::test]
async fn unauthorized_response_redirects_and_still_rejects() {
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::at("/projects");
    transport.on(Method::Get, "projects/", reply(401, json!({ "detail": "expired" })));
    let client = redirecting_client(&transport, &navigator);

    let err = client.get("projects/", RequestOptions::default()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
}

#[tokio::test]
async fn five_unauthorized_responses_in_one_tick_redirect_once() {
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::at("/risk");
    let paths = ["risk/profiles/", "risk/alerts/", "builds/", "pipelines/", "system/notifications/"];
    for path in paths {
        transport.on(Method::Get, path, reply(401, json!({})));
    }
    let client = redirecting_client(&transport, &navigator);

    let results = futures::future::join_all(paths.iter().map(|p| client.get(p, RequestOptions::default()))).await;

    assert!(results.iter().all(|r| r.as_ref().is_err_and(ApiError::is_unauthorized)));
    assert_eq!(navigator.redirects().len(), 1);
}

#[tokio::test]
async fn other_failures_do_not_redirect() {
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::at("/users");
    transport.on(Method::Get, "users/", reply(403, json!({ "detail": "no" })));
    transport.on(Method::Get, "roles/", Err(ApiError::Timeout(std::time::Duration::from_secs(10))));
    let client = redirecting_client(&transport, &navigator);

    let forbidden = client.get("users/", RequestOptions::default()).await.unwrap_err();
    let timeout = client.get("roles/", RequestOptions::default()).await.unwrap_err();

    assert_eq!(forbidden.status(), Some(403));
    assert!(matches!(timeout, ApiError::Timeout(_)));
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn calls_that_handle_unauthorized_themselves_do_not_redirect() {
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::at("/");
    transport.on(Method::Get, "users/me/", reply(401, json!({})));
    let client = redirecting_client(&transport, &navigator);

    let err = client
        .get("users/me/", RequestOptions::default().handles_unauthorized())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(navigator.redirects().is_empty());
}

#[tokio::test]
async fn no_redirect_while_already_on_login_page() {
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::at("/login");
    transport.on(Method::Get, "system/notifications/unread_count/", reply(401, json!({})));
    let client = redirecting_client(&transport, &navigator);

    let _ = client.get("system/notifications/unread_count/", RequestOptions::default()).await;

    assert!(navigator.redirects().is_empty());
}

#[test]
fn latch_reports_fired_state() {
    let navigator = RecordingNavigator::at("/");
    let redirect = UnauthorizedRedirect::new(navigator.clone(), "/login");
    let client = ApiClient::builder(ApiConfig::default(), ScriptedTransport::default()).build();
    let request = client.prepare(Method::Get, "projects/", RequestOptions::default());
    let unauthorized = ApiError::Status { status: 401, body: json!({}) };

    assert!(!redirect.has_fired());
    redirect.on_error(&request, &unauthorized);
    redirect.on_error(&request, &unauthorized);
    assert!(redirect.has_fired());
    assert_eq!(navigator.redirects().len(), 1);
}

// =============================================================
// BearerToken
// =============================================================

#[test]
fn bearer_attaches_stored_token() {
    let tokens = TokenStore::new();
    tokens.set("t0k3n");
    let config = ApiConfig { auth_mode: AuthMode::Bearer, ..ApiConfig::default() };
    let client = ApiClient::builder(config, ScriptedTransport::default())
        .request_interceptor(BearerToken::new(tokens))
        .build();

    let request = client.prepare(Method::Get, "projects/", RequestOptions::default());

    assert_eq!(request.header("authorization"), Some("Bearer t0k3n"));
    assert!(!request.include_credentials);
}

#[test]
fn bearer_without_token_adds_no_header() {
    let client = ApiClient::builder(ApiConfig::default(), ScriptedTransport::default())
        .request_interceptor(BearerToken::new(TokenStore::new()))
        .build();

    let request = client.prepare(Method::Get, "projects/", RequestOptions::default());

    assert_eq!(request.header("Authorization"), None);
}

#[tokio::test]
async fn bearer_token_is_cleared_on_unauthorized() {
    let tokens = TokenStore::new();
    tokens.set("stale");
    let transport = ScriptedTransport::default();
    transport.on(Method::Get, "projects/", reply(401, json!({})));
    let client = ApiClient::builder(ApiConfig::default(), transport.clone())
        .request_interceptor(BearerToken::new(tokens.clone()))
        .response_interceptor(BearerToken::new(tokens.clone()))
        .build();

    let _ = client.get("projects/", RequestOptions::default()).await;

    assert_eq!(tokens.get(), None);
    assert_eq!(transport.calls()[0].header("Authorization"), Some("Bearer stale"));
}

#[tokio::test]
async fn bearer_token_is_cleared_even_when_caller_handles_unauthorized() {
    let tokens = TokenStore::new();
    tokens.set("stale");
    let transport = ScriptedTransport::default();
    transport.on(Method::Get, "users/me/", reply(401, json!({})));
    let client = ApiClient::builder(ApiConfig::default(), transport)
        .response_interceptor(BearerToken::new(tokens.clone()))
        .build();

    let _ = client
        .get("users/me/", RequestOptions::default().handles_unauthorized())
        .await;

    assert_eq!(tokens.get(), None);
}

#[test]
fn bearer_skips_anonymous_requests() {
    let tokens = TokenStore::new();
    tokens.set("abc");
    let client = ApiClient::builder(ApiConfig::default(), ScriptedTransport::default())
        .request_interceptor(BearerToken::new(tokens))
        .build();

    let request = client.prepare(Method::Post, "users/login/", RequestOptions::default().anonymous());

    assert_eq!(request.header("Authorization"), None);
}

// =============================================================
// standard_client
// =============================================================

#[tokio::test]
async fn standard_cookie_client_forwards_credentials_and_redirects() {
    let transport = ScriptedTransport::default();
    let navigator = RecordingNavigator::at("/cicd");
    let tokens = TokenStore::new();
    tokens.set("ignored-in-cookie-mode");
    transport.on(Method::Get, "pipelines/", reply(401, json!({})));
    let client = standard_client(ApiConfig::default(), transport.clone(), navigator.clone(), &tokens, "/login");

    let _ = client.get("pipelines/", RequestOptions::default()).await;

    let call = &transport.calls()[0];
    assert!(call.include_credentials);
    assert_eq!(call.header("Authorization"), None);
    assert_eq!(navigator.redirects(), vec!["/login".to_owned()]);
}

#[test]
fn standard_bearer_client_attaches_token() {
    let tokens = TokenStore::new();
    tokens.set("abc");
    let config = ApiConfig { auth_mode: AuthMode::Bearer, ..ApiConfig::default() };
    let client = standard_client(config, ScriptedTransport::default(), RecordingNavigator::at("/"), &tokens, "/login");

    let request = client.prepare(Method::Get, "users/", RequestOptions::default());

    assert_eq!(request.header("Authorization"), Some("Bearer abc"));
}
