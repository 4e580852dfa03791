//! Authentication test helpers
//!
//! Creating users through the real register and login endpoints keeps
//! tests honest about what a client has to do.

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use super::TestApp;

/// A registered user with a live token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Register `name` as `<name>@example.com` and log in
pub async fn register_user(app: &TestApp, name: &str) -> TestUser {
    let email = format!("{}@example.com", name);
    let password = format!("{}-password", name);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": email, "username": name, "password": password })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let id = super::id_of(&body, "id");

    let token = login(app, &email, &password).await;
    TestUser {
        id,
        email,
        username: name.to_string(),
        password,
        token,
    }
}

/// Log in and return the bearer token
pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
