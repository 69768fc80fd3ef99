//! The gateway served over TCP, relaying to the fake store.

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde_json::{Value, json};
use shopgate::routes;
use shopgate::state::AppState;
use shopgate_integration_tests::{EXPECTED_BASIC_AUTH, FakeShopify, serve_gateway};

async fn gateway_for(store: &FakeShopify) -> String {
    let state = AppState::new(store.config(&[])).unwrap();
    let (base, _server) = serve_gateway(routes::app(state)).await;
    base
}

#[tokio::test]
async fn test_health_makes_no_remote_call() {
    let store = FakeShopify::start(Router::new()).await;
    let base = gateway_for(&store).await;

    let response = reqwest::get(format!("{base}/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
    assert!(store.requests().is_empty());
}

#[tokio::test]
async fn test_add_to_cart_round_trip() {
    let store = FakeShopify::start(Router::new().route(
        &FakeShopify::admin_path("draft_orders.json"),
        post(|| async {
            (
                StatusCode::CREATED,
                Json(json!({"draft_order": {"id": 7, "line_items": [
                    {"variant_id": 11, "quantity": 1, "title": "Mug"}
                ]}})),
            )
        }),
    ))
    .await;
    let base = gateway_for(&store).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/addtocart"))
        .form(&[("variant_id", "11"), ("quantity", "1"), ("title", "Mug")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Product added to cart");
    assert_eq!(body["order"]["id"], 7);
    let seen = store.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some(EXPECTED_BASIC_AUTH));
}

#[tokio::test]
async fn test_bad_form_never_reaches_store() {
    let store = FakeShopify::start(Router::new()).await;
    let base = gateway_for(&store).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/addtocart"))
        .form(&[("variant_id", "not-a-number"), ("quantity", "1"), ("title", "Mug")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("variant_id"));
    assert!(store.requests().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_is_reported_as_500() {
    let store = FakeShopify::start(Router::new().route(
        &FakeShopify::admin_path("price_rules.json"),
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    ))
    .await;
    let base = gateway_for(&store).await;

    let response = reqwest::get(format!("{base}/pricerules")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["price_rules"], Value::Null);
    assert!(body["message"].as_str().unwrap().starts_with("Error: "));
}
