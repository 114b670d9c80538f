//! HTTP API integration tests
//!
//! Drive the full router (auth layer, validation, services, in-memory store)
//! through `axum-test`.

mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::*;
use dreamscape::backend::auth::sessions::SessionKeys;
use dreamscape::shared::{DreamPage, DreamView};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn test_health() {
    let server = default_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = default_server();
    let response = server.get("/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_register_returns_token_and_profile() {
    let server = default_server();
    let response = server
        .post("/register")
        .json(&json!({
            "username": "alice",
            "email": " Alice@Example.com ",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_same_email_twice() {
    let server = default_server();
    register_user(&server, "alice").await;

    let response = server
        .post("/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let server = default_server();
    let response = server
        .post("/register")
        .json(&json!({ "username": "al", "email": "nope", "password": "short" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], 400);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["username", "email", "password"]);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let server = default_server();
    let response = server
        .post("/login")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_me() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "password123" }))
        .await;
    response.assert_status_ok();
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    let me = server.get("/me").authorization_bearer(&token).await;
    me.assert_status_ok();
    let body: Value = me.json();
    assert_eq!(body["id"], alice.id.as_str());
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let server = default_server();
    register_user(&server, "alice").await;

    let wrong_password = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;
    let unknown_user = server
        .post("/login")
        .json(&json!({ "username": "mallory", "password": "wrong-password" }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_user.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json::<Value>(), unknown_user.json::<Value>());
    assert_eq!(wrong_password.json::<Value>()["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = default_server();

    for path in ["/me", "/dreams", "/dreams/sharedtome", "/dreams/search"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["error"], "Not authorized, no token");
    }

    // Auth runs before body validation
    let response = server.post("/dreams/generate").json(&json!({})).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_and_orphan_tokens() {
    let server = default_server();

    let invalid = server.get("/me").authorization_bearer("garbage").await;
    invalid.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(invalid.json::<Value>()["error"], "Not authorized, token invalid");

    let orphan = SessionKeys::new(TEST_JWT_SECRET, Duration::days(30))
        .create_token(Uuid::new_v4(), "ghost")
        .unwrap();
    let unknown = server.get("/me").authorization_bearer(&orphan).await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.json::<Value>()["error"], "Not authorized, user not found");
}

#[tokio::test]
async fn test_generate_dream() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;

    let response = server
        .post("/dreams/generate")
        .authorization_bearer(&alice.token)
        .json(&json!({ "prompt": "a castle" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["imageUrl"], "http://img/x.png");
    assert_eq!(body["prompt"], "a castle");
    assert_eq!(body["likes"], 0);
    assert_eq!(body["dislikes"], 0);
    assert_eq!(body["isPublic"], false);
    assert_eq!(body["user"]["username"], "alice");

    let own: Vec<DreamView> = server
        .get("/dreams")
        .authorization_bearer(&alice.token)
        .await
        .json();
    assert_eq!(own.len(), 1);
}

#[tokio::test]
async fn test_generate_requires_prompt() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;

    let response = server
        .post("/dreams/generate")
        .authorization_bearer(&alice.token)
        .json(&json!({ "prompt": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "prompt");
}

#[tokio::test]
async fn test_generator_failures_map_to_status() {
    let cases = [
        (StubGenerator::RateLimited, StatusCode::TOO_MANY_REQUESTS),
        (StubGenerator::BadCredentials, StatusCode::UNAUTHORIZED),
        (StubGenerator::Url("no url here"), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (generator, status) in cases {
        let server = test_server(generator);
        let alice = register_user(&server, "alice").await;
        let response = server
            .post("/dreams/generate")
            .authorization_bearer(&alice.token)
            .json(&json!({ "prompt": "a castle" }))
            .await;
        response.assert_status(status);
    }
}

#[tokio::test]
async fn test_like_and_dislike_toggle() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    let bob = register_user(&server, "bob").await;
    let dream_id = create_dream(&server, &alice, "a castle").await;

    let react = |path: &'static str| {
        server
            .post(path)
            .authorization_bearer(&bob.token)
            .json(&json!({ "dreamId": dream_id }))
    };

    // Private dreams take no reactions
    let response = react("/dreams/like").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Public dream not found");

    publish_dream(&server, &alice, &dream_id).await;

    react("/dreams/like")
        .await
        .assert_json(&json!({ "message": "Liked successfully", "likes": 1, "dislikes": 0 }));
    react("/dreams/like")
        .await
        .assert_json(&json!({ "message": "Like removed", "likes": 0, "dislikes": 0 }));
    react("/dreams/dislike")
        .await
        .assert_json(&json!({ "message": "Disliked successfully", "likes": 0, "dislikes": 1 }));
    react("/dreams/like")
        .await
        .assert_json(&json!({ "message": "Liked successfully", "likes": 1, "dislikes": 0 }));
    react("/dreams/dislike")
        .await
        .assert_json(&json!({ "message": "Disliked successfully", "likes": 0, "dislikes": 1 }));
    react("/dreams/dislike")
        .await
        .assert_json(&json!({ "message": "Dislike removed", "likes": 0, "dislikes": 0 }));
}

#[tokio::test]
async fn test_share_then_publish_clears_shares() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    let bob = register_user(&server, "bob").await;
    let dream_id = create_dream(&server, &alice, "a castle").await;

    let shared = server
        .post("/dreams/share")
        .authorization_bearer(&alice.token)
        .json(&json!({ "dreamId": dream_id, "shareWith": bob.id }))
        .await;
    shared.assert_status_ok();
    let body: Value = shared.json();
    assert_eq!(body["message"], "Dream shared successfully");
    assert_eq!(body["dream"]["sharedWith"], json!([bob.id]));

    let to_bob: Vec<DreamView> = server
        .get("/dreams/sharedtome")
        .authorization_bearer(&bob.token)
        .await
        .json();
    assert_eq!(to_bob.len(), 1);
    assert_eq!(to_bob[0].user.username, "alice");

    let public = server
        .post("/dreams/share")
        .authorization_bearer(&alice.token)
        .json(&json!({ "dreamId": dream_id, "isPublic": true }))
        .await;
    assert_eq!(public.json::<Value>()["dream"]["sharedWith"], json!([]));

    // Sharing a public dream changes nothing
    let again = server
        .post("/dreams/share")
        .authorization_bearer(&alice.token)
        .json(&json!({ "dreamId": dream_id, "shareWith": bob.id }))
        .await;
    again.assert_status_ok();
    assert_eq!(again.json::<Value>()["dream"]["sharedWith"], json!([]));

    let feed: Vec<DreamView> = server.get("/dreams/public").await.json();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].shared_with, None);
}

#[tokio::test]
async fn test_share_errors() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    let bob = register_user(&server, "bob").await;
    let dream_id = create_dream(&server, &alice, "a castle").await;

    let not_owner = server
        .post("/dreams/share")
        .authorization_bearer(&bob.token)
        .json(&json!({ "dreamId": dream_id, "isPublic": true }))
        .await;
    not_owner.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(not_owner.json::<Value>()["error"], "Dream not found");

    let unknown_user = server
        .post("/dreams/share")
        .authorization_bearer(&alice.token)
        .json(&json!({ "dreamId": dream_id, "shareWith": Uuid::new_v4() }))
        .await;
    unknown_user.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(unknown_user.json::<Value>()["error"], "User not found");

    let bad_id = server
        .post("/dreams/share")
        .authorization_bearer(&alice.token)
        .json(&json!({ "dreamId": "123" }))
        .await;
    bad_id.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_popular_sort() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    let bob = register_user(&server, "bob").await;
    let carol = register_user(&server, "carol").await;

    let quiet = create_dream(&server, &alice, "quiet lake").await;
    let loved = create_dream(&server, &alice, "loved forest").await;
    let liked = create_dream(&server, &alice, "liked desert").await;
    for id in [&quiet, &loved, &liked] {
        publish_dream(&server, &alice, id).await;
    }

    for (user, id) in [(&bob, &loved), (&carol, &loved), (&bob, &liked)] {
        server
            .post("/dreams/like")
            .authorization_bearer(&user.token)
            .json(&json!({ "dreamId": id }))
            .await
            .assert_status_ok();
    }

    let popular: DreamPage = server
        .get("/dreams/filter/search")
        .authorization_bearer(&bob.token)
        .add_query_param("sortBy", "popular")
        .await
        .json();
    let ids: Vec<String> = popular.dreams.iter().map(|d| d.id.to_string()).collect();
    assert_eq!(ids, vec![loved.clone(), liked.clone(), quiet.clone()]);

    let recent: DreamPage = server
        .get("/dreams/filter/search")
        .authorization_bearer(&bob.token)
        .await
        .json();
    let ids: Vec<String> = recent.dreams.iter().map(|d| d.id.to_string()).collect();
    assert_eq!(ids, vec![liked, loved, quiet]);
}

#[tokio::test]
async fn test_pagination() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    for i in 0..25 {
        let id = create_dream(&server, &alice, &format!("castle {}", i)).await;
        publish_dream(&server, &alice, &id).await;
    }

    let page: DreamPage = server
        .get("/dreams/public/search")
        .add_query_param("query", "CASTLE")
        .add_query_param("page", 2)
        .add_query_param("limit", 10)
        .await
        .json();

    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.limit, 10);
    assert_eq!(page.dreams.len(), 10);
    assert_eq!(page.dreams[0].prompt, "castle 14");

    let last: DreamPage = server
        .get("/dreams/public/search")
        .add_query_param("page", 3)
        .add_query_param("limit", 10)
        .await
        .json();
    assert_eq!(last.dreams.len(), 5);
}

#[tokio::test]
async fn test_bad_pagination_is_400() {
    let server = default_server();
    let response = server
        .get("/dreams/public/search")
        .add_query_param("page", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["errors"][0]["field"], "page");
}

#[tokio::test]
async fn test_search_own_requires_query() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    create_dream(&server, &alice, "a castle").await;
    create_dream(&server, &alice, "a tower").await;

    let missing = server
        .get("/dreams/search")
        .authorization_bearer(&alice.token)
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let found: DreamPage = server
        .get("/dreams/search")
        .authorization_bearer(&alice.token)
        .add_query_param("query", "Castle")
        .await
        .json();
    assert_eq!(found.total, 1);
    assert_eq!(found.dreams[0].prompt, "a castle");
}

#[tokio::test]
async fn test_filter_search_scope_and_username() {
    let server = default_server();
    let alice = register_user(&server, "alice").await;
    let bob = register_user(&server, "bob").await;
    create_dream(&server, &alice, "secret garden").await;
    let public = create_dream(&server, &alice, "open garden").await;
    publish_dream(&server, &alice, &public).await;
    create_dream(&server, &bob, "bob garden").await;

    let for_bob: DreamPage = server
        .get("/dreams/filter/search")
        .authorization_bearer(&bob.token)
        .add_query_param("query", "garden")
        .add_query_param("username", "alice")
        .await
        .json();
    assert_eq!(for_bob.total, 1);
    assert_eq!(for_bob.dreams[0].id.to_string(), public);

    let private_only: DreamPage = server
        .get("/dreams/filter/search")
        .authorization_bearer(&alice.token)
        .add_query_param("isPublic", "false")
        .await
        .json();
    assert_eq!(private_only.total, 1);
    assert_eq!(private_only.dreams[0].prompt, "secret garden");

    let unknown = server
        .get("/dreams/filter/search")
        .authorization_bearer(&alice.token)
        .add_query_param("username", "nobody")
        .await;
    unknown.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(unknown.json::<Value>()["error"], "User not found");
}
