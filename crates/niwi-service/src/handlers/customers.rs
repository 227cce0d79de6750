//! Customer request handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use niwi_core::{
    CustomerRequest, LeadPriority, LeadStatus, RequestId, ServiceCategory,
};
use niwi_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Create request body.
#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    /// Category of service needed.
    pub service_category: ServiceCategory,
    /// Short title.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Free-form location.
    pub location: String,
    /// City.
    pub city: String,
    /// Province.
    pub province: String,
    /// Budget range lower bound, dollars.
    #[serde(default)]
    pub budget_min: Option<f64>,
    /// Budget range upper bound, dollars.
    #[serde(default)]
    pub budget_max: Option<f64>,
    /// Timeline, e.g. "ASAP".
    pub timeline: String,
    /// Urgency level.
    pub urgency: LeadPriority,
    /// Preferred contact channel.
    pub contact_preference: String,
    /// Property type, where relevant.
    #[serde(default)]
    pub property_type: Option<String>,
    /// Square footage, where relevant.
    #[serde(default)]
    pub square_footage: Option<u32>,
    /// Additional structured details.
    #[serde(default)]
    pub additional_details: serde_json::Value,
}

/// Create a new customer service request.
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateRequestBody>,
) -> Result<Json<CustomerRequest>, ApiError> {
    let now = chrono::Utc::now();
    let request = CustomerRequest {
        id: RequestId::generate(),
        customer_id: auth.user_id.to_string(),
        service_category: body.service_category,
        title: body.title,
        description: body.description,
        location: body.location,
        city: body.city,
        province: body.province,
        budget_min: body.budget_min,
        budget_max: body.budget_max,
        timeline: body.timeline,
        urgency: body.urgency,
        contact_preference: body.contact_preference,
        property_type: body.property_type,
        square_footage: body.square_footage,
        additional_details: body.additional_details,
        status: LeadStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state.store.put_request(&request)?;

    tracing::info!(
        request_id = %request.id,
        customer_id = %request.customer_id,
        category = ?request.service_category,
        "Customer request created"
    );

    Ok(Json(request))
}

/// Request list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Filter by status.
    #[serde(default)]
    pub status: Option<LeadStatus>,
}

/// List the current customer's requests, newest first.
pub async fn list_my_requests(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<CustomerRequest>>, ApiError> {
    let mut requests = state
        .store
        .list_requests_by_customer(&auth.user_id.to_string(), 100)?;

    if let Some(status) = query.status {
        requests.retain(|r| r.status == status);
    }

    Ok(Json(requests))
}

/// Look up a request owned by the caller.
fn owned_request(
    state: &AppState,
    auth: &AuthUser,
    request_id: &RequestId,
) -> Result<CustomerRequest, ApiError> {
    state
        .store
        .get_request(request_id)?
        .filter(|r| r.customer_id == auth.user_id.to_string())
        .ok_or_else(|| ApiError::NotFound("Customer request not found".into()))
}

/// Get one of the caller's requests.
pub async fn get_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(request_id): Path<RequestId>,
) -> Result<Json<CustomerRequest>, ApiError> {
    let request = owned_request(&state, &auth, &request_id)?;
    Ok(Json(request))
}

/// Update request body - only the fields present are patched.
#[derive(Debug, Deserialize)]
pub struct UpdateRequestBody {
    /// New category.
    #[serde(default)]
    pub service_category: Option<ServiceCategory>,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
    /// New city.
    #[serde(default)]
    pub city: Option<String>,
    /// New province.
    #[serde(default)]
    pub province: Option<String>,
    /// New budget lower bound.
    #[serde(default)]
    pub budget_min: Option<f64>,
    /// New budget upper bound.
    #[serde(default)]
    pub budget_max: Option<f64>,
    /// New timeline.
    #[serde(default)]
    pub timeline: Option<String>,
    /// New urgency.
    #[serde(default)]
    pub urgency: Option<LeadPriority>,
    /// New contact preference.
    #[serde(default)]
    pub contact_preference: Option<String>,
    /// New property type.
    #[serde(default)]
    pub property_type: Option<String>,
    /// New square footage.
    #[serde(default)]
    pub square_footage: Option<u32>,
}

/// Update one of the caller's requests. Only pending requests can change.
pub async fn update_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(request_id): Path<RequestId>,
    Json(body): Json<UpdateRequestBody>,
) -> Result<Json<CustomerRequest>, ApiError> {
    let mut request = owned_request(&state, &auth, &request_id)?;

    if !request.is_pending() {
        return Err(ApiError::BadRequest(
            "Cannot update request that has been assigned to professionals".into(),
        ));
    }

    if let Some(value) = body.service_category {
        request.service_category = value;
    }
    if let Some(value) = body.title {
        request.title = value;
    }
    if let Some(value) = body.description {
        request.description = value;
    }
    if let Some(value) = body.location {
        request.location = value;
    }
    if let Some(value) = body.city {
        request.city = value;
    }
    if let Some(value) = body.province {
        request.province = value;
    }
    if let Some(value) = body.budget_min {
        request.budget_min = Some(value);
    }
    if let Some(value) = body.budget_max {
        request.budget_max = Some(value);
    }
    if let Some(value) = body.timeline {
        request.timeline = value;
    }
    if let Some(value) = body.urgency {
        request.urgency = value;
    }
    if let Some(value) = body.contact_preference {
        request.contact_preference = value;
    }
    if let Some(value) = body.property_type {
        request.property_type = Some(value);
    }
    if let Some(value) = body.square_footage {
        request.square_footage = Some(value);
    }
    request.updated_at = chrono::Utc::now();

    state.store.put_request(&request)?;

    Ok(Json(request))
}

/// Delete response message.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message.
    pub message: String,
}

/// Delete one of the caller's requests. Only pending requests can go.
pub async fn delete_request(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(request_id): Path<RequestId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let request = owned_request(&state, &auth, &request_id)?;

    if !request.is_pending() {
        return Err(ApiError::BadRequest(
            "Cannot delete request that has been assigned to professionals".into(),
        ));
    }

    state.store.delete_request(&request_id)?;

    Ok(Json(DeleteResponse {
        message: "Customer request deleted successfully".into(),
    }))
}

/// Quick request body for the unauthenticated landing-page intake.
#[derive(Debug, Deserialize)]
pub struct QuickRequestBody {
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Category of service needed.
    pub service_category: ServiceCategory,
    /// Short title.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// City.
    pub city: String,
    /// Province.
    pub province: String,
    /// Free-form location; defaults to "{city}, {province}".
    #[serde(default)]
    pub location: Option<String>,
    /// Budget range lower bound, dollars.
    #[serde(default)]
    pub budget_min: Option<f64>,
    /// Budget range upper bound, dollars.
    #[serde(default)]
    pub budget_max: Option<f64>,
    /// Timeline; defaults to "ASAP".
    #[serde(default)]
    pub timeline: Option<String>,
    /// Urgency; defaults to medium.
    #[serde(default)]
    pub urgency: Option<LeadPriority>,
    /// Preferred contact channel; defaults to "either".
    #[serde(default)]
    pub contact_preference: Option<String>,
}

/// Create a quick request without an account (landing page intake).
///
/// The requester gets a synthetic `guest_<email>` customer id; their
/// contact details land in `additional_details` for the professional who
/// unlocks the lead.
pub async fn create_quick_request(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuickRequestBody>,
) -> Result<Json<CustomerRequest>, ApiError> {
    if body.email.is_empty() || body.phone.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and phone are required".into(),
        ));
    }

    let now = chrono::Utc::now();
    let location = body
        .location
        .unwrap_or_else(|| format!("{}, {}", body.city, body.province));

    let request = CustomerRequest {
        id: RequestId::generate(),
        customer_id: format!("guest_{}", body.email),
        service_category: body.service_category,
        title: body.title,
        description: body.description,
        location,
        city: body.city,
        province: body.province,
        budget_min: body.budget_min,
        budget_max: body.budget_max,
        timeline: body.timeline.unwrap_or_else(|| "ASAP".into()),
        urgency: body.urgency.unwrap_or(LeadPriority::Medium),
        contact_preference: body
            .contact_preference
            .unwrap_or_else(|| "either".into()),
        property_type: None,
        square_footage: None,
        additional_details: serde_json::json!({
            "email": body.email,
            "phone": body.phone,
            "is_guest_request": true,
        }),
        status: LeadStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state.store.put_request(&request)?;

    tracing::info!(
        request_id = %request.id,
        customer_id = %request.customer_id,
        "Quick request created"
    );

    Ok(Json(request))
}
