//! Admin handlers: request triage, lead assignment, profile verification,
//! and platform stats.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use niwi_core::{
    BusinessProfile, CustomerRequest, Lead, LeadId, LeadPriority, LeadStatus, RequestId,
    ServiceCategory, UserId,
};
use niwi_store::{LeadFilter, RequestFilter, Store};

use crate::auth::Admin;
use crate::error::ApiError;
use crate::state::AppState;

/// Request list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Filter by status.
    #[serde(default)]
    pub status: Option<LeadStatus>,
    /// Filter by service category.
    #[serde(default)]
    pub service_category: Option<ServiceCategory>,
    /// Filter by urgency.
    #[serde(default)]
    pub urgency: Option<LeadPriority>,
}

/// List all customer requests, newest first.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    Admin(_admin): Admin,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<CustomerRequest>>, ApiError> {
    let filter = RequestFilter {
        status: query.status,
        service_category: query.service_category,
        urgency: query.urgency,
    };

    let requests = state.store.list_requests(&filter, 1000)?;
    Ok(Json(requests))
}

/// Lead assignment body.
#[derive(Debug, Deserialize)]
pub struct AssignLeadBody {
    /// The request to assign.
    pub customer_request_id: RequestId,
    /// The professional to assign it to.
    pub professional_id: UserId,
}

/// Assign a customer request to a professional as a lead.
///
/// The same request may be assigned to several professionals, but only once
/// to each; the request flips to `assigned` on the first assignment.
pub async fn assign_lead(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Json(body): Json<AssignLeadBody>,
) -> Result<Json<Lead>, ApiError> {
    let mut request = state
        .store
        .get_request(&body.customer_request_id)?
        .ok_or_else(|| ApiError::NotFound("Customer request not found".into()))?;

    state
        .store
        .get_profile(&body.professional_id)?
        .ok_or_else(|| ApiError::NotFound("Professional profile not found".into()))?;

    if state
        .store
        .find_lead_for_request(&body.customer_request_id, &body.professional_id)?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Lead already assigned to this professional".into(),
        ));
    }

    let lead = Lead::assign(body.customer_request_id, body.professional_id);
    state.store.put_lead(&lead)?;

    request.status = LeadStatus::Assigned;
    request.updated_at = chrono::Utc::now();
    state.store.put_request(&request)?;

    tracing::info!(
        admin = %admin.email,
        lead_id = %lead.id,
        request_id = %body.customer_request_id,
        professional_id = %body.professional_id,
        "Lead assigned"
    );

    Ok(Json(lead))
}

/// Lead list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    /// Filter by status.
    #[serde(default)]
    pub status: Option<LeadStatus>,
    /// Filter by professional.
    #[serde(default)]
    pub professional_id: Option<UserId>,
}

/// List all leads, newest first.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Admin(_admin): Admin,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let filter = LeadFilter {
        status: query.status,
        professional_id: query.professional_id,
    };

    let leads = state.store.list_leads(&filter, 1000)?;
    Ok(Json(leads))
}

/// Delete response message.
#[derive(Debug, Serialize)]
pub struct DeleteLeadResponse {
    /// Confirmation message.
    pub message: String,
}

/// Delete a lead assignment.
///
/// When no assignments remain, the underlying request goes back to
/// `pending` so it shows up for triage again.
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Path(lead_id): Path<LeadId>,
) -> Result<Json<DeleteLeadResponse>, ApiError> {
    let lead = state
        .store
        .get_lead(&lead_id)?
        .ok_or_else(|| ApiError::NotFound("Lead not found".into()))?;

    state.store.delete_lead(&lead_id)?;

    if state
        .store
        .count_leads_for_request(&lead.customer_request_id)?
        == 0
    {
        if let Some(mut request) = state.store.get_request(&lead.customer_request_id)? {
            request.status = LeadStatus::Pending;
            request.updated_at = chrono::Utc::now();
            state.store.put_request(&request)?;
        }
    }

    tracing::info!(admin = %admin.email, lead_id = %lead_id, "Lead deleted");

    Ok(Json(DeleteLeadResponse {
        message: format!("Lead {lead_id} deleted successfully"),
    }))
}

/// Profile verification body.
#[derive(Debug, Deserialize)]
pub struct VerifyProfileBody {
    /// Verified badge (default: true).
    #[serde(default = "default_true")]
    pub is_verified: bool,
    /// Featured placement in search results (default: false).
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

/// Verify or unverify a business profile.
pub async fn verify_profile(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Path(user_id): Path<UserId>,
    Json(body): Json<VerifyProfileBody>,
) -> Result<Json<BusinessProfile>, ApiError> {
    let mut profile = state
        .store
        .get_profile(&user_id)?
        .ok_or_else(|| ApiError::NotFound("Business profile not found".into()))?;

    profile.is_verified = body.is_verified;
    profile.is_featured = body.is_featured;
    profile.updated_at = chrono::Utc::now();

    state.store.put_profile(&profile)?;

    tracing::info!(
        admin = %admin.email,
        user_id = %user_id,
        is_verified = %body.is_verified,
        is_featured = %body.is_featured,
        "Profile verification updated"
    );

    Ok(Json(profile))
}

/// Profile counts for the dashboard.
#[derive(Debug, Serialize)]
pub struct ProfileStats {
    /// Total business profiles.
    pub total_profiles: u64,
    /// Admin-verified profiles.
    pub verified_profiles: u64,
    /// Share of profiles verified, percent.
    pub verification_rate: f64,
}

/// Request counts for the dashboard.
#[derive(Debug, Serialize)]
pub struct RequestStats {
    /// Total customer requests.
    pub total_requests: u64,
    /// Requests awaiting assignment.
    pub pending_requests: u64,
    /// Share of requests assigned, percent.
    pub conversion_rate: f64,
}

/// Lead counts for the dashboard.
#[derive(Debug, Serialize)]
pub struct LeadStats {
    /// Total lead assignments.
    pub total_leads: u64,
    /// Leads in assigned/contacted/in-progress states.
    pub active_leads: u64,
}

/// Platform statistics response.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Profile counts.
    pub profile_stats: ProfileStats,
    /// Request counts.
    pub request_stats: RequestStats,
    /// Lead counts.
    pub lead_stats: LeadStats,
    /// Total credit accounts.
    pub total_accounts: u64,
}

/// Get platform statistics for the admin dashboard.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Admin(_admin): Admin,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.store.platform_stats()?;

    let verification_rate = if stats.total_profiles > 0 {
        stats.verified_profiles as f64 / stats.total_profiles as f64 * 100.0
    } else {
        0.0
    };
    let conversion_rate = if stats.total_requests > 0 {
        (stats.total_requests - stats.pending_requests) as f64 / stats.total_requests as f64
            * 100.0
    } else {
        0.0
    };

    Ok(Json(StatsResponse {
        profile_stats: ProfileStats {
            total_profiles: stats.total_profiles,
            verified_profiles: stats.verified_profiles,
            verification_rate,
        },
        request_stats: RequestStats {
            total_requests: stats.total_requests,
            pending_requests: stats.pending_requests,
            conversion_rate,
        },
        lead_stats: LeadStats {
            total_leads: stats.total_leads,
            active_leads: stats.active_leads,
        },
        total_accounts: stats.total_accounts,
    }))
}
