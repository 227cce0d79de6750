//! Customer request intake and management tests.

mod common;

use common::TestHarness;
use serde_json::json;

use niwi_core::{LeadStatus, RequestId};
use niwi_store::Store;

fn request_body() -> serde_json::Value {
    json!({
        "service_category": "plumber",
        "title": "Leaking kitchen tap",
        "description": "Tap drips constantly, needs a new cartridge",
        "location": "Queen St W, Toronto",
        "city": "Toronto",
        "province": "ON",
        "budget_min": 100.0,
        "budget_max": 300.0,
        "timeline": "ASAP",
        "urgency": "high",
        "contact_preference": "either"
    })
}

// ============================================================================
// Create / list / get
// ============================================================================

#[tokio::test]
async fn create_and_list_requests() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&request_body())
        .await;

    response.assert_status_ok();
    let created: serde_json::Value = response.json();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["customer_id"], harness.customer_id.to_string());

    let response = harness
        .server
        .get("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .await;

    response.assert_status_ok();
    let listed: serde_json::Value = response.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_requests_filters_by_status() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&request_body())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/api/customers/requests?status=assigned")
        .add_header("authorization", harness.customer_auth())
        .await;

    response.assert_status_ok();
    let listed: serde_json::Value = response.json();
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn requests_are_scoped_to_their_owner() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&request_body())
        .await;
    let created: serde_json::Value = response.json();
    let request_id = created["id"].as_str().unwrap().to_string();

    // Another user cannot read it.
    let other = TestHarness::token_for(
        &niwi_core::UserId::generate(),
        "other@example.com",
        niwi_service::auth::Role::Customer,
    );
    let response = harness
        .server
        .get(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", format!("Bearer {other}"))
        .await;

    response.assert_status_not_found();

    // The owner can.
    let response = harness
        .server
        .get(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", harness.customer_auth())
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn create_request_requires_auth() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests")
        .json(&request_body())
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Update / delete (only while pending)
// ============================================================================

#[tokio::test]
async fn update_patches_pending_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&request_body())
        .await;
    let created: serde_json::Value = response.json();
    let request_id = created["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .put(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", harness.customer_auth())
        .json(&json!({ "title": "Replace kitchen tap", "urgency": "urgent" }))
        .await;

    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["title"], "Replace kitchen tap");
    assert_eq!(updated["urgency"], "urgent");
    // Unpatched fields survive.
    assert_eq!(updated["city"], "Toronto");
}

#[tokio::test]
async fn assigned_requests_cannot_change() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&request_body())
        .await;
    let created: serde_json::Value = response.json();
    let request_id: RequestId = created["id"].as_str().unwrap().parse().unwrap();

    // Simulate assignment.
    let mut request = harness.store.get_request(&request_id).unwrap().unwrap();
    request.status = LeadStatus::Assigned;
    harness.store.put_request(&request).unwrap();

    let response = harness
        .server
        .put(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", harness.customer_auth())
        .json(&json!({ "title": "Too late" }))
        .await;
    response.assert_status_bad_request();

    let response = harness
        .server
        .delete(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", harness.customer_auth())
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn delete_removes_pending_request() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&request_body())
        .await;
    let created: serde_json::Value = response.json();
    let request_id = created["id"].as_str().unwrap().to_string();

    harness
        .server
        .delete(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", harness.customer_auth())
        .await
        .assert_status_ok();

    harness
        .server
        .get(&format!("/api/customers/requests/{request_id}"))
        .add_header("authorization", harness.customer_auth())
        .await
        .assert_status_not_found();
}

// ============================================================================
// Quick request (unauthenticated landing-page intake)
// ============================================================================

#[tokio::test]
async fn quick_request_needs_no_account() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests/quick")
        .json(&json!({
            "email": "jane@example.com",
            "phone": "555-0100",
            "service_category": "electrician",
            "title": "Panel upgrade",
            "description": "100A to 200A service upgrade",
            "city": "Ottawa",
            "province": "ON"
        }))
        .await;

    response.assert_status_ok();
    let created: serde_json::Value = response.json();
    assert_eq!(created["customer_id"], "guest_jane@example.com");
    assert_eq!(created["location"], "Ottawa, ON");
    assert_eq!(created["timeline"], "ASAP");
    assert_eq!(created["urgency"], "medium");
    assert_eq!(created["contact_preference"], "either");
    assert_eq!(created["additional_details"]["is_guest_request"], true);
    assert_eq!(created["additional_details"]["phone"], "555-0100");
}

#[tokio::test]
async fn quick_request_rejects_missing_contact() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/customers/requests/quick")
        .json(&json!({
            "email": "",
            "phone": "",
            "service_category": "electrician",
            "title": "Panel upgrade",
            "description": "Upgrade",
            "city": "Ottawa",
            "province": "ON"
        }))
        .await;

    response.assert_status_bad_request();
}
