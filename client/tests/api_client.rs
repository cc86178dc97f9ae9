//! HTTP behavior of the shared API client against a mock backend

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mockito::Matcher;
use reqwest::Method;
use restructuring_client::api::{ApiClient, RequestOptions, SessionHooks};
use serde::Deserialize;
use serde_json::{Value, json};

struct CountingHooks {
    token: Option<String>,
    unauthorized_calls: AtomicUsize,
}

impl CountingHooks {
    fn new(token: Option<&str>) -> Arc<Self> {
        Arc::new(CountingHooks {
            token: token.map(str::to_string),
            unauthorized_calls: AtomicUsize::new(0),
        })
    }
}

impl SessionHooks for CountingHooks {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn on_unauthorized(&self) {
        self.unauthorized_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn error_message_is_taken_from_json_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/plan/me")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Ugyldig forespørsel"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let err = api
        .get::<Value>("/plan/me")
        .await
        .expect_err("expected a status error");

    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "Ugyldig forespørsel");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_json_error_body_yields_generic_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/plan/me")
        .with_status(500)
        .with_header("content-type", "text/html")
        .with_body("<html>Internal Server Error</html>")
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let err = api
        .get::<Value>("/plan/me")
        .await
        .expect_err("expected a status error");

    assert_eq!(err.status(), 500);
    assert_eq!(err.to_string(), "Request failed with status 500");
}

#[tokio::test]
async fn bearer_token_comes_from_the_session_hooks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/journal/all")
        .match_header("authorization", "Bearer hook-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    api.configure(CountingHooks::new(Some("hook-token")));

    let entries: Value = api.get("/journal/all").await.expect("request");
    assert_eq!(entries, json!([]));
    mock.assert_async().await;
}

#[tokio::test]
async fn skip_auth_omits_the_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    api.configure(CountingHooks::new(Some("hook-token")));

    api.send(
        Method::POST,
        "/auth/login",
        RequestOptions::json(json!({"email": "a@b.no"})).skip_auth(),
    )
    .await
    .expect("request");

    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_response_runs_the_hook_exactly_once() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/user/me")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Unauthorized"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let hooks = CountingHooks::new(Some("stale"));
    api.configure(hooks.clone());

    let err = api
        .get::<Value>("/user/me")
        .await
        .expect_err("expected a 401");

    assert!(err.is_unauthorized());
    assert_eq!(hooks.unauthorized_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_statuses_never_run_the_unauthorized_hook() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/user/me")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Forbidden"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let hooks = CountingHooks::new(Some("tok"));
    api.configure(hooks.clone());

    let err = api
        .get::<Value>("/user/me")
        .await
        .expect_err("expected a 403");

    assert_eq!(err.status(), 403);
    assert_eq!(hooks.unauthorized_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transport_failure_reports_status_zero() {
    // Nothing listens on this port.
    let api = ApiClient::new("http://127.0.0.1:9");
    let err = api
        .get::<Value>("/plan/me")
        .await
        .expect_err("expected a transport error");

    assert_eq!(err.status(), 0);
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn unexpected_response_shape_is_a_decode_error() {
    #[derive(Debug, Deserialize)]
    struct Expected {
        #[allow(dead_code)]
        token: String,
    }

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/user/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"something": "else"}"#)
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let err = api
        .get::<Expected>("/user/me")
        .await
        .expect_err("expected a decode error");

    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn raw_download_exposes_content_disposition() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/insurance/send")
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_header("content-disposition", r#"attachment; filename="soknad.xml""#)
        .with_body("<xml/>")
        .create_async()
        .await;

    let api = ApiClient::new(server.url());
    let response = api
        .send_raw(Method::POST, "/insurance/send", RequestOptions::default())
        .await
        .expect("request");

    assert_eq!(response.status, 200);
    assert_eq!(
        response.content_disposition.as_deref(),
        Some(r#"attachment; filename="soknad.xml""#)
    );
    assert_eq!(response.bytes, b"<xml/>");
}
