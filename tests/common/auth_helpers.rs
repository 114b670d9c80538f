//! Authentication test helpers

use axum_test::TestServer;
use serde_json::{json, Value};

/// A registered account
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Register `username` with a derived email and `password123`
pub async fn register_user(server: &TestServer, username: &str) -> TestUser {
    let response = server
        .post("/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    TestUser {
        id: body["user"]["id"].as_str().expect("user id").to_string(),
        username: username.to_string(),
        token: body["token"].as_str().expect("token").to_string(),
    }
}

/// Generate a dream for `user` and return its id
pub async fn create_dream(server: &TestServer, user: &TestUser, prompt: &str) -> String {
    let response = server
        .post("/dreams/generate")
        .authorization_bearer(&user.token)
        .json(&json!({ "prompt": prompt }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["id"].as_str().expect("dream id").to_string()
}

/// Make a dream public
pub async fn publish_dream(server: &TestServer, owner: &TestUser, dream_id: &str) {
    server
        .post("/dreams/share")
        .authorization_bearer(&owner.token)
        .json(&json!({ "dreamId": dream_id, "isPublic": true }))
        .await
        .assert_status_ok();
}
