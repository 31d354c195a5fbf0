#![cfg(feature = "server")]

use account_ledger::server::{router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(AppState::new())
}

async fn send(app: &Router, method: &str, uri: &str, cpf: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cpf) = cpf {
        builder = builder.header("cpf", cpf);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_account_lifecycle() {
    let app = app();

    let (status, body) = send(&app, "POST", "/account", None, Some(json!({ "cpf": "111", "name": "Ana" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["account"]["id"].is_string());

    let (status, body) = send(&app, "POST", "/account", None, Some(json!({ "cpf": "111", "name": "Ana" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Customer already exists");

    let (status, _) = send(&app, "PUT", "/account", Some("111"), Some(json!({ "name": "Ana Maria" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/account", Some("111"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer"]["name"], "Ana Maria");

    let (status, body) = send(&app, "DELETE", "/account", Some("111"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", "/account", Some("111"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deposit_withdraw_and_statement() {
    let app = app();
    send(&app, "POST", "/account", None, Some(json!({ "cpf": "111", "name": "Ana" }))).await;

    let (status, body) = send(&app, "POST", "/deposit", Some("111"), Some(json!({ "description": "salary", "amount": 100 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operation"]["type"], "deposit");

    let (status, _) = send(&app, "POST", "/withdraw", Some("111"), Some(json!({ "description": "rent", "amount": 40 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/withdraw", Some("111"), Some(json!({ "description": "car", "amount": 1000 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient balance");

    let (_, body) = send(&app, "GET", "/balance", Some("111"), None).await;
    assert_eq!(body["balance"], 60.0);

    let (_, body) = send(&app, "GET", "/statement", Some("111"), None).await;
    assert_eq!(body["statement"].as_array().unwrap().len(), 2);

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let (status, body) = send(&app, "GET", &format!("/statement/date?date={today}"), Some("111"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statement"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "GET", "/statement/date?date=2001-09-11", Some("111"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["statement"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_customer_and_bad_bodies() {
    let app = app();

    let (status, body) = send(&app, "GET", "/balance", Some("999"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");

    let (status, _) = send(&app, "GET", "/statement", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "POST", "/account", None, Some(json!({ "cpf": "111", "name": "Ana" }))).await;

    let request = Request::builder()
        .method("POST")
        .uri("/deposit")
        .header("cpf", "111")
        .body(Body::from("{broken"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PUT", "/account", Some("111"), Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid name");
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

async fn send_text(app: &Router, method: &str, uri: &str, cpf: &str, text: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("cpf", cpf)
        .header("content-type", "text/plain")
        .body(Body::from(text.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn test_text_body_does_not_mask_access_check() {
    let app = app();
    send(&app, "POST", "/account", None, Some(json!({ "cpf": "111", "name": "Ana" }))).await;

    assert_eq!(send_text(&app, "GET", "/balance", "999", "hello").await, StatusCode::NOT_FOUND);
    assert_eq!(send_text(&app, "GET", "/statement", "111", "hello").await, StatusCode::OK);
    assert_eq!(send_text(&app, "POST", "/deposit", "111", "hello").await, StatusCode::BAD_REQUEST);
    assert_eq!(send_text(&app, "DELETE", "/account", "111", "hello").await, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/account", Some("111"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
