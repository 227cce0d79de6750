//! Admin triage, lead assignment, verification, and stats tests.

mod common;

use common::TestHarness;
use serde_json::json;

// ============================================================================
// Fixtures
// ============================================================================

/// Create a customer request through the API, returning its id.
async fn create_request(harness: &TestHarness) -> String {
    let response = harness
        .server
        .post("/api/customers/requests")
        .add_header("authorization", harness.customer_auth())
        .json(&json!({
            "service_category": "roofing",
            "title": "Shingle replacement",
            "description": "Wind damage on the south slope",
            "location": "Hamilton, ON",
            "city": "Hamilton",
            "province": "ON",
            "timeline": "Within 1 month",
            "urgency": "medium",
            "contact_preference": "phone"
        }))
        .await;

    response.assert_status_ok();
    let created: serde_json::Value = response.json();
    created["id"].as_str().unwrap().to_string()
}

/// Create the harness professional's profile through the API.
async fn create_profile(harness: &TestHarness) {
    harness
        .server
        .post("/api/professionals/profile")
        .add_header("authorization", harness.professional_auth())
        .json(&json!({
            "business_name": "Summit Roofing",
            "service_categories": ["roofing"],
            "description": "Residential roofing",
            "service_areas": ["Hamilton"],
            "years_experience": 8,
            "city": "Hamilton",
            "province": "ON",
            "postal_code": "L8P 1A1"
        }))
        .await
        .assert_status_ok();
}

// ============================================================================
// Role enforcement
// ============================================================================

#[tokio::test]
async fn admin_routes_reject_professionals() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/admin/requests")
        .add_header("authorization", harness.professional_auth())
        .await;

    response.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_require_auth() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/admin/stats").await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Request triage
// ============================================================================

#[tokio::test]
async fn admin_lists_requests_with_filters() {
    let harness = TestHarness::new();
    create_request(&harness).await;

    let response = harness
        .server
        .get("/api/admin/requests")
        .add_header("authorization", harness.admin_auth())
        .await;

    response.assert_status_ok();
    let requests: serde_json::Value = response.json();
    assert_eq!(requests.as_array().unwrap().len(), 1);

    let response = harness
        .server
        .get("/api/admin/requests?status=pending&service_category=roofing")
        .add_header("authorization", harness.admin_auth())
        .await;

    response.assert_status_ok();
    let requests: serde_json::Value = response.json();
    assert_eq!(requests.as_array().unwrap().len(), 1);

    let response = harness
        .server
        .get("/api/admin/requests?service_category=plumber")
        .add_header("authorization", harness.admin_auth())
        .await;

    response.assert_status_ok();
    let requests: serde_json::Value = response.json();
    assert!(requests.as_array().unwrap().is_empty());
}

// ============================================================================
// Lead assignment
// ============================================================================

#[tokio::test]
async fn assign_lead_flips_request_to_assigned() {
    let harness = TestHarness::new();
    let request_id = create_request(&harness).await;
    create_profile(&harness).await;

    let response = harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&json!({
            "customer_request_id": request_id,
            "professional_id": harness.professional_id.to_string()
        }))
        .await;

    response.assert_status_ok();
    let lead: serde_json::Value = response.json();
    assert_eq!(lead["status"], "assigned");
    assert_eq!(lead["customer_request_id"], request_id);

    // The underlying request is now assigned.
    let response = harness
        .server
        .get("/api/admin/requests?status=assigned")
        .add_header("authorization", harness.admin_auth())
        .await;
    let requests: serde_json::Value = response.json();
    assert_eq!(requests.as_array().unwrap().len(), 1);

    // The professional sees the lead.
    let response = harness
        .server
        .get("/api/professionals/leads")
        .add_header("authorization", harness.professional_auth())
        .await;
    let leads: serde_json::Value = response.json();
    assert_eq!(leads.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_assignment_conflicts() {
    let harness = TestHarness::new();
    let request_id = create_request(&harness).await;
    create_profile(&harness).await;

    let body = json!({
        "customer_request_id": request_id,
        "professional_id": harness.professional_id.to_string()
    });

    harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&body)
        .await
        .assert_status_ok();

    let response = harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&body)
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn assignment_requires_request_and_profile() {
    let harness = TestHarness::new();
    let request_id = create_request(&harness).await;

    // No profile yet.
    let response = harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&json!({
            "customer_request_id": request_id,
            "professional_id": harness.professional_id.to_string()
        }))
        .await;
    response.assert_status_not_found();

    // Unknown request.
    create_profile(&harness).await;
    let response = harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&json!({
            "customer_request_id": niwi_core::RequestId::generate().to_string(),
            "professional_id": harness.professional_id.to_string()
        }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn deleting_last_lead_resets_request_to_pending() {
    let harness = TestHarness::new();
    let request_id = create_request(&harness).await;
    create_profile(&harness).await;

    let response = harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&json!({
            "customer_request_id": request_id,
            "professional_id": harness.professional_id.to_string()
        }))
        .await;
    let lead: serde_json::Value = response.json();
    let lead_id = lead["id"].as_str().unwrap();

    harness
        .server
        .delete(&format!("/api/admin/leads/{lead_id}"))
        .add_header("authorization", harness.admin_auth())
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/api/admin/requests?status=pending")
        .add_header("authorization", harness.admin_auth())
        .await;
    let requests: serde_json::Value = response.json();
    assert_eq!(requests.as_array().unwrap().len(), 1);

    let response = harness
        .server
        .get("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .await;
    let leads: serde_json::Value = response.json();
    assert!(leads.as_array().unwrap().is_empty());
}

// ============================================================================
// Profile verification
// ============================================================================

#[tokio::test]
async fn verify_profile_sets_badges() {
    let harness = TestHarness::new();
    create_profile(&harness).await;

    let response = harness
        .server
        .put(&format!(
            "/api/admin/profiles/{}/verify",
            harness.professional_id
        ))
        .add_header("authorization", harness.admin_auth())
        .json(&json!({ "is_verified": true, "is_featured": true }))
        .await;

    response.assert_status_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["is_verified"], true);
    assert_eq!(profile["is_featured"], true);

    // Verified-only search now finds it.
    let response = harness
        .server
        .get("/api/professionals?is_verified=true")
        .await;
    let profiles: serde_json::Value = response.json();
    assert_eq!(profiles.as_array().unwrap().len(), 1);
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn stats_count_platform_activity() {
    let harness = TestHarness::new();
    let request_id = create_request(&harness).await;
    create_profile(&harness).await;

    harness
        .server
        .post("/api/admin/leads")
        .add_header("authorization", harness.admin_auth())
        .json(&json!({
            "customer_request_id": request_id,
            "professional_id": harness.professional_id.to_string()
        }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/api/admin/stats")
        .add_header("authorization", harness.admin_auth())
        .await;

    response.assert_status_ok();
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["request_stats"]["total_requests"], 1);
    assert_eq!(stats["request_stats"]["pending_requests"], 0);
    assert_eq!(stats["lead_stats"]["total_leads"], 1);
    assert_eq!(stats["lead_stats"]["active_leads"], 1);
    assert_eq!(stats["profile_stats"]["total_profiles"], 1);
    assert_eq!(stats["request_stats"]["conversion_rate"], 100.0);
}
