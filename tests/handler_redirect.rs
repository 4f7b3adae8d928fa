mod common;

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use link_shortener::routes;
use serde_json::json;

#[tokio::test]
async fn test_redirect_success() {
    let pool = common::memory_pool().await;
    common::create_test_link(&pool, "abc12345", "https://example.com/target").await;

    let (state, mut rx) = common::create_test_state(pool);
    let server = TestServer::new(routes::router(state)).unwrap();

    let response = server.get("/abc12345").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION),
        "https://example.com/target"
    );

    let event = rx.try_recv().unwrap();
    assert_eq!(event.short_code, "abc12345");
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let pool = common::memory_pool().await;
    let (state, mut rx) = common::create_test_state(pool);
    let server = TestServer::new(routes::router(state)).unwrap();

    let response = server.get("/zzzzzzzz").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "Short URL not found");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_malformed_code() {
    let pool = common::memory_pool().await;
    let (state, _rx) = common::create_test_state(pool);
    let server = TestServer::new(routes::router(state)).unwrap();

    server.get("/does-not-exist").await.assert_status_not_found();
    server.get("/abc").await.assert_status_not_found();
    server.get("/abc!2345").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_still_works_when_click_queue_closed() {
    let pool = common::memory_pool().await;
    common::create_test_link(&pool, "closed12", "https://example.com").await;

    let (state, rx) = common::create_test_state(pool.clone());
    drop(rx);
    let server = TestServer::new(routes::router(state)).unwrap();

    let response = server.get("/closed12").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(common::click_count(&pool, "closed12").await, 0);
}

#[tokio::test]
async fn test_create_then_follow_counts_click() {
    let pool = common::memory_pool().await;
    let (state, _worker) = common::create_counting_state(pool.clone());
    let server = TestServer::new(routes::router(state)).unwrap();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/page" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let code = created.json::<serde_json::Value>()["shortCode"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{code}")).await;
    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.header(header::LOCATION),
        "https://example.com/page"
    );

    common::wait_for_clicks(&pool, &code, 1).await;
}
