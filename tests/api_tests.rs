use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use uuid::Uuid;

use picks_api::api::{create_router, AppState};
use picks_api::config::Config;
use picks_api::seed;

fn test_config() -> Config {
    Config {
        secret_key: "test-secret".to_string(),
        ..Config::default()
    }
}

/// Server with the demo catalog seeded
async fn create_test_server() -> TestServer {
    let state = AppState::new(test_config());
    seed::seed_catalog(&state).await;
    TestServer::new(create_router(state)).unwrap()
}

/// Server with a completely empty catalog
fn create_empty_server() -> TestServer {
    let state = AppState::new(test_config());
    TestServer::new(create_router(state)).unwrap()
}

async fn register_and_login(server: &TestServer, email: &str) -> String {
    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": email,
            "password": "hunter42"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = server
        .post("/auth/login")
        .json(&json!({
            "email": email,
            "password": "hunter42"
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["access_token"].as_str().unwrap().to_string()
}

async fn item_id_by_title(server: &TestServer, title: &str) -> String {
    let response = server.get("/items").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    items
        .iter()
        .find(|item| item["title"] == title)
        .unwrap_or_else(|| panic!("item {title} not in catalog"))["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn rate(server: &TestServer, token: &str, item_id: &str, score: f64) {
    let response = server
        .post("/ratings")
        .authorization_bearer(token)
        .json(&json!({
            "item_id": item_id,
            "score": score
        }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_register_returns_created_user() {
    let server = create_test_server().await;

    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": "hunter42",
            "full_name": "Avid Reader"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["email"], "reader@example.com");
    assert_eq!(created["full_name"], "Avid Reader");
    assert!(created.get("password_hash").is_none());
    assert!(created.get("password").is_none());
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let server = create_test_server().await;

    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": "reader@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let server = create_test_server().await;
    register_and_login(&server, "reader@example.com").await;

    let response = server
        .post("/auth/register")
        .json(&json!({
            "email": "Reader@Example.com",
            "password": "hunter42"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let server = create_test_server().await;
    register_and_login(&server, "reader@example.com").await;

    let response = server
        .post("/auth/login")
        .json(&json!({
            "email": "reader@example.com",
            "password": "wrong-password"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_me_requires_token() {
    let server = create_test_server().await;
    let response = server.get("/users/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_me_returns_profile() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "reader@example.com").await;

    let response = server.get("/users/me").authorization_bearer(&token).await;
    response.assert_status_ok();
    let profile: Value = response.json();
    assert_eq!(profile["email"], "reader@example.com");
}

#[tokio::test]
async fn test_list_items_is_seeded_and_sorted() {
    let server = create_test_server().await;

    let response = server.get("/items").await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 10);

    let titles: Vec<&str> = items.iter().map(|i| i["title"].as_str().unwrap()).collect();
    let mut sorted = titles.clone();
    sorted.sort();
    assert_eq!(titles, sorted);
}

#[tokio::test]
async fn test_create_item() {
    let server = create_test_server().await;

    let response = server
        .post("/items")
        .json(&json!({
            "title": "Dune",
            "description": "Epic science fiction novel.",
            "category": "Books",
            "tags": "science fiction,desert,politics"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["title"], "Dune");

    let response = server.get("/items").await;
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 11);
}

#[tokio::test]
async fn test_rate_item_rejects_out_of_range_score() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "reader@example.com").await;
    let item_id = item_id_by_title(&server, "Inception").await;

    let response = server
        .post("/ratings")
        .authorization_bearer(&token)
        .json(&json!({
            "item_id": item_id,
            "score": 7.0
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_unknown_item_not_found() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "reader@example.com").await;

    let response = server
        .post("/ratings")
        .authorization_bearer(&token)
        .json(&json!({
            "item_id": Uuid::new_v4(),
            "score": 4.0
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rerating_overwrites_previous_score() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "reader@example.com").await;
    let item_id = item_id_by_title(&server, "Inception").await;

    rate(&server, &token, &item_id, 2.0).await;
    rate(&server, &token, &item_id, 4.5).await;

    let response = server.get("/ratings/me").authorization_bearer(&token).await;
    response.assert_status_ok();
    let ratings: Vec<Value> = response.json();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["score"].as_f64().unwrap(), 4.5);
    assert_eq!(ratings[0]["item"]["title"], "Inception");
}

#[tokio::test]
async fn test_update_preferences() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "reader@example.com").await;

    let response = server
        .post("/users/me/preferences")
        .authorization_bearer(&token)
        .json(&json!({
            "tags": ["thriller", "space", "thriller"]
        }))
        .await;

    response.assert_status_ok();
    let profile: Value = response.json();
    let preferences: Vec<&str> = profile["preferences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    assert_eq!(preferences, vec!["thriller", "space"]);
}

#[tokio::test]
async fn test_recommendations_require_auth() {
    let server = create_test_server().await;
    let response = server.get("/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recommendations_fall_back_to_popularity_for_fresh_user() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "fresh@example.com").await;

    // No ratings and no preference tags anywhere: both personalized
    // signals are empty, so the whole list comes from the fallback.
    let response = server
        .get("/recommendations")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 5);
    assert!(recommendations
        .iter()
        .all(|entry| entry["strategy"] == "popular"));
}

#[tokio::test]
async fn test_recommendations_from_preference_tags() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "reader@example.com").await;

    server
        .post("/users/me/preferences")
        .authorization_bearer(&token)
        .json(&json!({ "tags": ["thriller"] }))
        .await
        .assert_status_ok();

    let response = server
        .get("/recommendations")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();

    // Only the thriller-tagged items match, each covering the user's
    // single interest completely.
    let titles: Vec<&str> = recommendations
        .iter()
        .map(|entry| entry["item"]["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Inception"));
    assert!(titles.contains(&"Parasite"));
    assert!(recommendations
        .iter()
        .all(|entry| entry["strategy"] == "content"));
    assert!(recommendations
        .iter()
        .all(|entry| entry["score"].as_f64().unwrap() == 1.0));
}

#[tokio::test]
async fn test_recommendations_merge_collaborative_and_content() {
    let server = create_test_server().await;
    let target = register_and_login(&server, "target@example.com").await;
    let neighbor = register_and_login(&server, "neighbor@example.com").await;

    let inception = item_id_by_title(&server, "Inception").await;
    let interstellar = item_id_by_title(&server, "Interstellar").await;

    rate(&server, &target, &inception, 5.0).await;
    rate(&server, &neighbor, &inception, 4.5).await;
    rate(&server, &neighbor, &interstellar, 5.0).await;

    let response = server
        .get("/recommendations")
        .authorization_bearer(&target)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();

    // The neighbor's five-star rating carries Interstellar in through the
    // collaborative signal (similarity 1.0 x 5.0), and its tag overlap
    // with the target's rated items adds a content share on top.
    let top = &recommendations[0];
    assert_eq!(top["item"]["title"], "Interstellar");
    assert_eq!(top["strategy"], "hybrid");
    assert!(top["score"].as_f64().unwrap() > 5.0);

    // The item the target already rated never comes back.
    assert!(recommendations
        .iter()
        .all(|entry| entry["item"]["title"] != "Inception"));
}

#[tokio::test]
async fn test_recommendations_respect_top_k() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "fresh@example.com").await;

    let response = server
        .get("/recommendations")
        .add_query_param("top_k", 2)
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recommendations_zero_top_k_yields_not_found() {
    let server = create_test_server().await;
    let token = register_and_login(&server, "fresh@example.com").await;

    let response = server
        .get("/recommendations")
        .add_query_param("top_k", 0)
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommendations_not_found_with_empty_catalog() {
    let server = create_empty_server();
    let token = register_and_login(&server, "fresh@example.com").await;

    let response = server
        .get("/recommendations")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
