//! Authentication flow tests (require a live PostgreSQL).

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_register_and_login() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Test Owner",
                "email": "owner@example.com",
                "password": "crimson-otter-battery-42",
                "role": "owner",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["access_token"].is_string());

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "email": "owner@example.com",
                "password": "crimson-otter-battery-42",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["user"]["role"], "owner");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;

    app.request(
        "POST",
        "/api/auth/register",
        Some(json!({
            "name": "Client",
            "email": "client@example.com",
            "password": "crimson-otter-battery-42",
            "role": "client",
        })),
        None,
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "email": "client@example.com",
                "password": "wrong-password-entirely",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    // Policy check happens before any database work, so this runs
    // without a live PostgreSQL.
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Weak",
                "email": "weak@example.com",
                "password": "password",
                "role": "client",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validates_email_shape() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": "Bad Email",
                "email": "not-an-email",
                "password": "crimson-otter-battery-42",
                "role": "client",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
