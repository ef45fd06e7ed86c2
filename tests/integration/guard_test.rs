//! Session gate behavior on protected routes.

use axum::body::Body;
use http::{Request, StatusCode};

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_is_public_route() {
    // No token required; the route only 401s if the gate wrongly covers it.
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/catalog", None, None).await;
    assert_ne!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_auth() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/owner/dashboard", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_browser_navigation_redirects_with_original_path() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/owner/dashboard")
        .header("accept", "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = app.dispatch(request).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response
        .headers
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(location, "/auth/login?redirect=/api/owner/dashboard");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/profile", None, Some("not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_client_namespace_is_gated() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/client/bookings", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
