//! Product listing through the HTTP router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use ecom_integration_tests::TestApp;

#[tokio::test]
async fn test_list_products() {
    let app = TestApp::new();
    let widget = app.store.add_product("widget", 999, 5).await;
    app.store.add_product("gadget", 2500, 0).await;

    let resp = app.get("/api/v1/products").await;

    assert_eq!(resp.status, StatusCode::OK);
    let products = resp.body.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["id"], widget.id.as_i32());
    assert_eq!(products[0]["name"], "widget");
    assert_eq!(products[0]["price"], json!(9.99));
    assert_eq!(products[0]["quantity"], 5);
    assert!(products[0]["imageUrl"].is_string());
    assert!(products[0]["createdAt"].is_string());
}

#[tokio::test]
async fn test_list_products_empty() {
    let app = TestApp::new();
    let resp = app.get("/api/v1/products").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!([]));
}

#[tokio::test]
async fn test_list_products_store_failure() {
    let app = TestApp::new();
    app.store.fail_product_reads().await;

    let resp = app.get("/api/v1/products").await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, json!({"error": "Failed to get products"}));
}
