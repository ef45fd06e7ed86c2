//! End-to-end booking lifecycle tests (require a live PostgreSQL).

use http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::TestApp;

async fn register(app: &TestApp, name: &str, email: &str, role: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "name": name,
                "email": email,
                "password": "crimson-otter-battery-42",
                "role": role,
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn list_machine(app: &TestApp, owner_token: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/owner/machines",
            Some(json!({
                "name": "20t Excavator",
                "code": "EX-20",
                "category": "earthmoving",
                "price_per_hour_cents": 15000,
                "specs": { "location": "Yard 4" },
            })),
            Some(owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let template_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            &format!("/api/owner/machines/{template_id}/instances"),
            Some(json!({ "code": "EX-20-001" })),
            Some(owner_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    template_id
}

async fn request_booking(app: &TestApp, client_token: &str, template_id: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/client/bookings",
            Some(json!({
                "template_id": template_id,
                "start_time": "2030-01-01T08:00:00Z",
                "end_time": "2030-01-01T12:00:00Z",
            })),
            Some(client_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "pending_renter_approval");
    response.body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_full_approval_flow() {
    let app = TestApp::new().await;
    let owner = register(&app, "Owner", "owner-flow@example.com", "owner").await;
    let client = register(&app, "Client", "client-flow@example.com", "client").await;
    let template_id = list_machine(&app, &owner).await;

    // A zero count is rejected before any capacity math.
    let response = app
        .request(
            "POST",
            "/api/client/availability",
            Some(json!({
                "template_id": template_id,
                "start_time": "2030-01-01T08:00:00Z",
                "end_time": "2030-01-01T12:00:00Z",
                "requested_count": 0,
            })),
            Some(&client),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Availability gate before booking.
    let response = app
        .request(
            "POST",
            "/api/client/availability",
            Some(json!({
                "template_id": template_id,
                "start_time": "2030-01-01T08:00:00Z",
                "end_time": "2030-01-01T12:00:00Z",
                "requested_count": 1,
            })),
            Some(&client),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["available"], true);
    // 4h * 15000¢
    assert_eq!(response.body["data"]["total_cost_cents"], 60000);

    let booking_id = request_booking(&app, &client, &template_id).await;

    let response = app
        .request(
            "POST",
            &format!("/api/owner/bookings/{booking_id}/approve"),
            Some(json!({})),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "approved_by_renter");
    assert_eq!(response.body["data"]["instance_code"], "EX-20-001");

    // A second approve must observe the transition and conflict.
    let response = app
        .request(
            "POST",
            &format!("/api/owner/bookings/{booking_id}/approve"),
            Some(json!({})),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_reject_requires_reason() {
    let app = TestApp::new().await;
    let owner = register(&app, "Owner", "owner-rej@example.com", "owner").await;
    let client = register(&app, "Client", "client-rej@example.com", "client").await;
    let template_id = list_machine(&app, &owner).await;
    let booking_id = request_booking(&app, &client, &template_id).await;

    let response = app
        .request(
            "POST",
            &format!("/api/owner/bookings/{booking_id}/reject"),
            Some(json!({ "message": "   " })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/api/owner/bookings/{booking_id}/reject"),
            Some(json!({ "message": "Unit is in maintenance that week" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "rejected_by_renter");

    // The reason landed on the message thread.
    let response = app
        .request(
            "GET",
            &format!("/api/bookings/{booking_id}/messages"),
            None,
            Some(&client),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let messages = response.body["data"].as_array().unwrap();
    assert!(
        messages
            .iter()
            .any(|m: &Value| m["content"] == "Unit is in maintenance that week")
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_client_cancels_sent_back_booking() {
    let app = TestApp::new().await;
    let owner = register(&app, "Owner", "owner-sb@example.com", "owner").await;
    let client = register(&app, "Client", "client-sb@example.com", "client").await;
    let template_id = list_machine(&app, &owner).await;
    let booking_id = request_booking(&app, &client, &template_id).await;

    let response = app
        .request(
            "POST",
            &format!("/api/owner/bookings/{booking_id}/send-back"),
            Some(json!({ "message": "Please shorten the range" })),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "sent_back_to_client");

    // Owner actions are disabled once the booking left pending.
    let response = app
        .request(
            "POST",
            &format!("/api/owner/bookings/{booking_id}/approve"),
            Some(json!({})),
            Some(&owner),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            &format!("/api/client/bookings/{booking_id}/cancel"),
            Some(json!({})),
            Some(&client),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "canceled_by_client");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set TEST_DATABASE_URL)"]
async fn test_dashboard_reflects_bookings() {
    let app = TestApp::new().await;
    let owner = register(&app, "Owner", "owner-dash@example.com", "owner").await;
    let client = register(&app, "Client", "client-dash@example.com", "client").await;
    let template_id = list_machine(&app, &owner).await;
    let booking_id = request_booking(&app, &client, &template_id).await;

    app.request(
        "POST",
        &format!("/api/owner/bookings/{booking_id}/approve"),
        Some(json!({})),
        Some(&owner),
    )
    .await;

    let response = app
        .request("GET", "/api/owner/dashboard", None, Some(&owner))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.body["data"];
    assert_eq!(data["totals"]["total_machines"], 1);
    assert_eq!(data["totals"]["active_bookings"], 1);
    assert_eq!(data["totals"]["pending_bookings"], 0);
    assert_eq!(data["revenue_series"].as_array().unwrap().len(), 6);
    assert_eq!(data["utilization"][0]["ratio"], 1.0);
}
