//! Registration and login through the HTTP router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use ecom_integration_tests::TestApp;

fn registration(email: &str, password: &str) -> serde_json::Value {
    json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": email,
        "password": password,
    })
}

#[tokio::test]
async fn test_register_returns_created() {
    let app = TestApp::new();

    let resp = app
        .post_json(
            "/api/v1/register",
            &registration("ada@example.com", "hunter22"),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.body["email"], "ada@example.com");
    assert!(resp.body["id"].is_i64());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    let body = registration("ada@example.com", "hunter22");

    app.post_json("/api/v1/register", &body, None).await;
    let resp = app.post_json("/api/v1/register", &body, None).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.body,
        json!({"error": "user with email ada@example.com already exists"})
    );
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new();

    for body in [
        registration("not-an-email", "hunter22"),
        registration("ada@example.com", "12345"),
        json!({"email": "ada@example.com", "password": "hunter22"}),
    ] {
        let resp = app.post_json("/api/v1/register", &body, None).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(
            resp.body["error"]
                .as_str()
                .unwrap()
                .starts_with("validation error"),
            "{}",
            resp.body
        );
    }
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::new();
    let resp = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/register")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["error"], "Invalid request payload");
}

#[tokio::test]
async fn test_login_success_shape() {
    let app = TestApp::new();
    let registered = app
        .post_json(
            "/api/v1/register",
            &registration("ada@example.com", "hunter22"),
            None,
        )
        .await;

    let resp = app
        .post_json(
            "/api/v1/login",
            &json!({"email": "ada@example.com", "password": "hunter22"}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "login successful");
    assert_eq!(
        resp.body["user_id"],
        registered.body["id"].as_i64().unwrap().to_string()
    );
    assert!(!resp.body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.post_json(
        "/api/v1/register",
        &registration("ada@example.com", "hunter22"),
        None,
    )
    .await;

    let resp = app
        .post_json(
            "/api/v1/login",
            &json!({"email": "ada@example.com", "password": "nope-nope"}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body, json!({"error": "invalid credentials"}));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::new();
    let resp = app
        .post_json(
            "/api/v1/login",
            &json!({"email": "nobody@example.com", "password": "hunter22"}),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}
