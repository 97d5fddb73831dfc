// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end tests for the gateway's HTTP surface.
//!
//! Exercises the router exactly as a caller would: login, bearer-JWT
//! enforcement, envelope validation, and the aggregate response shape. All
//! provider keys are backed by the echo stub so no outbound calls happen.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use fanout_gateway::application::Dispatcher;
use fanout_gateway::domain::ProviderKey;
use fanout_gateway::infrastructure::config::GatewayConfig;
use fanout_gateway::infrastructure::llm::echo::EchoAdapter;
use fanout_gateway::infrastructure::llm::ProviderRegistry;
use fanout_gateway::presentation::{app, AppState};

fn test_config() -> GatewayConfig {
    GatewayConfig {
        basic_auth_user: Some("admin".into()),
        basic_auth_pass: Some("hunter2".into()),
        jwt_secret: Some("test-secret".into()),
        ..GatewayConfig::default()
    }
}

/// Router with every provider key served by the echo stub.
fn test_app() -> Router {
    let mut registry = ProviderRegistry::empty();
    for key in ProviderKey::ALL {
        registry.insert(key, Arc::new(EchoAdapter::new()));
    }

    let state = Arc::new(AppState {
        config: Arc::new(test_config()),
        dispatcher: Dispatcher::new(Arc::new(registry)),
    });
    app(state)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_with_bearer(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn item(content: &str) -> Value {
    json!({"model": "m", "messages": [{"role": "user", "content": content}]})
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post(
            "/api/login",
            json!({"username": "admin", "password": "hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["expiresIn"], json!(28800));
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_then_protected_summary() {
    let app = test_app();
    let token = login(&app).await;

    let response = app
        .oneshot(post_with_bearer(
            "/api/summary",
            &token,
            json!({"data": {"azure": [item("hi")]}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["azure"][0]["ok"], json!(true));
}

#[tokio::test]
async fn test_login_with_bad_password() {
    let app = test_app();
    let response = app
        .oneshot(post(
            "/api/login",
            json!({"username": "admin", "password": "wrong"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Invalid username or password"));
}

#[tokio::test]
async fn test_summary_without_authorization_header() {
    let response = test_app()
        .oneshot(post("/api/summary", json!({"data": {}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Authorization header is missing"));
}

#[tokio::test]
async fn test_summary_with_invalid_token() {
    let response = test_app()
        .oneshot(post_with_bearer(
            "/api/summary",
            "not-a-jwt",
            json!({"data": {}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Invalid access token"));
}

#[tokio::test]
async fn test_legacy_route_needs_no_auth() {
    let response = test_app()
        .oneshot(post("/api", json!({"data": {"azure": [item("a")]}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_aggregate_has_one_field_per_key_in_input_order() {
    let first = item("one");
    let second = item("two");
    let response = test_app()
        .oneshot(post(
            "/api",
            json!({
                "data": {
                    "openai": [first.clone(), second.clone()],
                    "anthropic": [item("three")],
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body.as_object().unwrap().len(), 2);
    let openai = body["openai"].as_array().unwrap();
    assert_eq!(openai.len(), 2);
    assert_eq!(openai[0]["payload"], first);
    assert_eq!(openai[1]["payload"], second);
    assert_eq!(body["anthropic"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_item_is_isolated_from_siblings() {
    let response = test_app()
        .oneshot(post(
            "/api",
            json!({
                "data": {
                    "openai": [
                        {"messages": [{"role": "user", "content": "no model"}]},
                        item("fine"),
                    ],
                    "azure": [item("also fine")],
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["openai"][0]["ok"], json!(false));
    assert_eq!(body["openai"][1]["ok"], json!(true));
    assert_eq!(body["azure"][0]["ok"], json!(true));
}

#[tokio::test]
async fn test_unknown_provider_rejects_whole_request() {
    let response = test_app()
        .oneshot(post(
            "/api",
            json!({
                "data": {
                    "openai": [item("valid")],
                    "dall-e": [item("nope")],
                }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Invalid API key"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("malformed"));
}

#[tokio::test]
async fn test_missing_data_field_is_rejected() {
    let response = test_app()
        .oneshot(post("/api", json!({"payload": {}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_data_yields_empty_aggregate() {
    let response = test_app()
        .oneshot(post("/api", json!({"data": {}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));
}
