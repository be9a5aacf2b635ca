//! Shared helpers for gateway integration tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use mandarin_gateway::{
    ServerConfig,
    core::chat::{DEFAULT_CHAT_MODEL, DEFAULT_TUTOR_PROMPT},
    routes,
    state::AppState,
};

pub const TTS_KEY: &str = "sk-test-tts";
pub const CHAT_KEY: &str = "di-test-chat";
pub const SPEECH_PATH: &str = "/v1/audio/speech";
pub const FALLBACK_PATH: &str = "/translate_tts";
pub const CHAT_PATH: &str = "/v1/openai/chat/completions";

/// Configuration pointing every provider at `upstream` (a mock server URI).
pub fn create_test_config(upstream: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        tts_api_key: Some(TTS_KEY.to_string()),
        openai_tts_url: format!("{upstream}{SPEECH_PATH}"),
        openai_tts_model: "tts-1".to_string(),
        fallback_tts_url: format!("{upstream}{FALLBACK_PATH}"),
        fallback_tts_language: "zh-CN".to_string(),
        tts_timeout_seconds: 5,
        chat_api_key: Some(CHAT_KEY.to_string()),
        chat_completions_url: format!("{upstream}{CHAT_PATH}"),
        chat_model: DEFAULT_CHAT_MODEL.to_string(),
        chat_temperature: 0.7,
        chat_system_prompt: DEFAULT_TUTOR_PROMPT.to_string(),
        chat_timeout_seconds: 5,
        cors_allowed_origins: None,
        rate_limit_requests_per_second: 100_000,
        rate_limit_burst_size: 100_000,
    }
}

pub async fn create_app(config: ServerConfig) -> Router {
    let state: Arc<AppState> = AppState::new(config).await;
    routes::create_app_router(state)
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Send a request and decode the JSON reply.
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Serve the router on an ephemeral port and return its base URL.
pub async fn spawn_gateway(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
