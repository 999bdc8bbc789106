//! Shared harness for the HTTP API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use aisha::config::{GatewayConfig, GenerativeConfig};
use aisha::gateway::GatewayClient;
use aisha::generative::GenerativeClient;
use aisha::http::HttpCaller;
use aisha::server::{AppState, build_app};
use aisha::store::Database;
use aisha::test_support::{MockTransport, memory_database};

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub transport: Arc<MockTransport>,
}

/// App wired to an in-memory database, with every outbound call answered by
/// `transport`. Both API keys are configured.
pub async fn test_app(transport: Arc<MockTransport>) -> TestApp {
    test_app_with_keys(transport, Some("gateway-key"), Some("gemini-key")).await
}

pub async fn test_app_with_keys(
    transport: Arc<MockTransport>,
    gateway_key: Option<&str>,
    gemini_key: Option<&str>,
) -> TestApp {
    let db = memory_database().await;
    let caller = HttpCaller::new(transport.clone());

    let gateway = GatewayConfig {
        base_url: "https://ngumzo.test/v1".to_string(),
        sender_id: Some("AISHA".to_string()),
        api_key: gateway_key.map(str::to_string),
    };
    let generative = GenerativeConfig {
        base_url: "https://gemini.test/v1beta".to_string(),
        api_key: gemini_key.map(str::to_string),
        ..GenerativeConfig::default()
    };

    let state = AppState {
        db: db.clone(),
        gateway: GatewayClient::new(caller.clone(), gateway),
        generative: GenerativeClient::new(caller, generative),
    };

    TestApp {
        app: build_app(state, 30),
        db,
        transport,
    }
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}
