//! Common test utilities and helpers
//!
//! - `TestApp`: the full router over an in-memory store, driven with
//!   `tower::ServiceExt::oneshot`
//! - Authentication helpers (register + login in one call)
//! - Custom assertion macros
#![allow(dead_code)]

#[macro_use]
pub mod assertions;
pub mod auth_helpers;

pub use auth_helpers::*;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use kanban::backend::realtime::ConnectionHandle;
use kanban::backend::routes::create_router;
use kanban::backend::server::AppState;
use kanban::backend::store::MemoryStore;
use kanban::shared::AppConfig;

pub const TEST_SECRET: &str = "test-secret";

/// Configuration for tests: cheap bcrypt, fixed secret, no database
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret(TEST_SECRET)
        .bcrypt_cost(4)
        .ws_outgoing_buffer(16)
        .build()
        .expect("test config is valid")
}

/// Status code and parsed JSON body (`Null` when the body is empty)
pub type TestResponse = (StatusCode, Value);

pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(test_config(), Arc::new(MemoryStore::new()));
        let router = create_router(state.clone());
        Self { state, router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, auth_header(token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn delete_with(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), Some(body)).await
    }

    /// Attach a fake connection to a board and return its receiving end
    pub fn subscribe(&self, board_id: Uuid, user_id: Uuid) -> mpsc::Receiver<axum::extract::ws::Utf8Bytes> {
        let (tx, rx) = mpsc::channel(64);
        self.state.registry().connect(board_id, ConnectionHandle::new(user_id, tx));
        rx
    }
}

/// Extract a UUID field from a JSON body
pub fn id_of(body: &Value, field: &str) -> Uuid {
    body[field]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("missing uuid field {} in {}", field, body))
}

/// Drain every frame currently queued on a fake connection
pub fn drain(rx: &mut mpsc::Receiver<axum::extract::ws::Utf8Bytes>) -> Vec<Value> {
    let mut events = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        events.push(serde_json::from_str(frame.as_str()).unwrap());
    }
    events
}
