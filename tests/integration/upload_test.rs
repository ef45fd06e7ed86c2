//! Upload boundary: ticketed PUT and media serving.

use axum::body::Body;
use http::{Request, StatusCode};

use renthub_storage::Presigner;

use crate::helpers::{TEST_SECRET, TestApp};

fn ticket_for(path: &str, content_type: &str) -> String {
    let presigner = Presigner::new(TEST_SECRET, 15);
    let (ticket, _) = presigner.issue(path, content_type).unwrap();
    ticket
}

#[tokio::test]
async fn test_upload_then_fetch_media() {
    let app = TestApp::new().await;
    let ticket = ticket_for("machines/test/front.jpg", "image/jpeg");

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/uploads/{ticket}"))
        .header("content-type", "image/jpeg")
        .body(Body::from(&b"jpeg-bytes"[..]))
        .unwrap();
    let response = app.dispatch(request).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .request("GET", "/api/media/machines/test/front.jpg", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "image/jpeg"
    );
}

#[tokio::test]
async fn test_upload_content_type_must_match_ticket() {
    let app = TestApp::new().await;
    let ticket = ticket_for("machines/test/a.png", "image/png");

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/uploads/{ticket}"))
        .header("content-type", "application/zip")
        .body(Body::from(&b"zip"[..]))
        .unwrap();
    let response = app.dispatch(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_with_forged_ticket_rejected() {
    let app = TestApp::new().await;
    let forged = Presigner::new("wrong-secret", 15)
        .issue("machines/test/b.png", "image/png")
        .unwrap()
        .0;

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/uploads/{forged}"))
        .header("content-type", "image/png")
        .body(Body::from(&b"data"[..]))
        .unwrap();
    let response = app.dispatch(request).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_media_is_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/media/machines/nope/missing.jpg", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
