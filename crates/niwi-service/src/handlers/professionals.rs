//! Professional profile and lead handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use niwi_core::{BusinessProfile, Lead, LeadId, LeadStatus, ServiceCategory, UserId};
use niwi_store::{ProfileFilter, Store};

use crate::auth::Professional;
use crate::error::ApiError;
use crate::state::AppState;

/// Create profile body.
#[derive(Debug, Deserialize)]
pub struct CreateProfileBody {
    /// Business display name.
    pub business_name: String,
    /// Categories of service offered.
    pub service_categories: Vec<ServiceCategory>,
    /// Business description.
    pub description: String,
    /// Cities or regions served.
    pub service_areas: Vec<String>,
    /// Years in business.
    pub years_experience: u32,
    /// Trade license number, if any.
    #[serde(default)]
    pub license_number: Option<String>,
    /// Whether proof of insurance has been checked.
    #[serde(default)]
    pub insurance_verified: bool,
    /// Business website.
    #[serde(default)]
    pub website: Option<String>,
    /// Business phone.
    #[serde(default)]
    pub business_phone: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    pub city: String,
    /// Province.
    pub province: String,
    /// Postal code.
    pub postal_code: String,
    /// Hourly rate range lower bound, dollars.
    #[serde(default)]
    pub hourly_rate_min: Option<f64>,
    /// Hourly rate range upper bound, dollars.
    #[serde(default)]
    pub hourly_rate_max: Option<f64>,
}

/// Create the caller's business profile. A professional has at most one.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Json(body): Json<CreateProfileBody>,
) -> Result<Json<BusinessProfile>, ApiError> {
    if state.store.get_profile(&auth.user_id)?.is_some() {
        return Err(ApiError::Conflict("Business profile already exists".into()));
    }

    let now = chrono::Utc::now();
    let profile = BusinessProfile {
        user_id: auth.user_id,
        business_name: body.business_name,
        service_categories: body.service_categories,
        description: body.description,
        service_areas: body.service_areas,
        years_experience: body.years_experience,
        license_number: body.license_number,
        insurance_verified: body.insurance_verified,
        website: body.website,
        business_phone: body.business_phone,
        address: body.address,
        city: body.city,
        province: body.province,
        postal_code: body.postal_code,
        hourly_rate_min: body.hourly_rate_min,
        hourly_rate_max: body.hourly_rate_max,
        rating: 0.0,
        review_count: 0,
        is_featured: false,
        is_verified: false,
        created_at: now,
        updated_at: now,
    };

    state.store.put_profile(&profile)?;

    tracing::info!(
        user_id = %auth.user_id,
        business_name = %profile.business_name,
        "Business profile created"
    );

    Ok(Json(profile))
}

/// Get the caller's business profile.
pub async fn get_my_profile(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
) -> Result<Json<BusinessProfile>, ApiError> {
    let profile = state
        .store
        .get_profile(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("Business profile not found".into()))?;

    Ok(Json(profile))
}

/// Update profile body - only the fields present are patched.
///
/// Ratings, review counts, and verification flags are maintained by admins
/// and the review pipeline; they cannot be set here.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    /// New business name.
    #[serde(default)]
    pub business_name: Option<String>,
    /// New service categories.
    #[serde(default)]
    pub service_categories: Option<Vec<ServiceCategory>>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New service areas.
    #[serde(default)]
    pub service_areas: Option<Vec<String>>,
    /// New years in business.
    #[serde(default)]
    pub years_experience: Option<u32>,
    /// New license number.
    #[serde(default)]
    pub license_number: Option<String>,
    /// New insurance verification state.
    #[serde(default)]
    pub insurance_verified: Option<bool>,
    /// New website.
    #[serde(default)]
    pub website: Option<String>,
    /// New business phone.
    #[serde(default)]
    pub business_phone: Option<String>,
    /// New street address.
    #[serde(default)]
    pub address: Option<String>,
    /// New city.
    #[serde(default)]
    pub city: Option<String>,
    /// New province.
    #[serde(default)]
    pub province: Option<String>,
    /// New postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// New hourly rate lower bound.
    #[serde(default)]
    pub hourly_rate_min: Option<f64>,
    /// New hourly rate upper bound.
    #[serde(default)]
    pub hourly_rate_max: Option<f64>,
}

/// Update the caller's business profile.
pub async fn update_my_profile(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<BusinessProfile>, ApiError> {
    let mut profile = state
        .store
        .get_profile(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("Business profile not found".into()))?;

    if let Some(value) = body.business_name {
        profile.business_name = value;
    }
    if let Some(value) = body.service_categories {
        profile.service_categories = value;
    }
    if let Some(value) = body.description {
        profile.description = value;
    }
    if let Some(value) = body.service_areas {
        profile.service_areas = value;
    }
    if let Some(value) = body.years_experience {
        profile.years_experience = value;
    }
    if let Some(value) = body.license_number {
        profile.license_number = Some(value);
    }
    if let Some(value) = body.insurance_verified {
        profile.insurance_verified = value;
    }
    if let Some(value) = body.website {
        profile.website = Some(value);
    }
    if let Some(value) = body.business_phone {
        profile.business_phone = Some(value);
    }
    if let Some(value) = body.address {
        profile.address = Some(value);
    }
    if let Some(value) = body.city {
        profile.city = value;
    }
    if let Some(value) = body.province {
        profile.province = value;
    }
    if let Some(value) = body.postal_code {
        profile.postal_code = value;
    }
    if let Some(value) = body.hourly_rate_min {
        profile.hourly_rate_min = Some(value);
    }
    if let Some(value) = body.hourly_rate_max {
        profile.hourly_rate_max = Some(value);
    }
    profile.updated_at = chrono::Utc::now();

    state.store.put_profile(&profile)?;

    Ok(Json(profile))
}

/// Lead list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    /// Filter by status.
    #[serde(default)]
    pub status: Option<LeadStatus>,
}

/// List the caller's leads, newest first.
pub async fn list_my_leads(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = state
        .store
        .list_leads_by_professional(&auth.user_id, query.status)?;

    Ok(Json(leads))
}

/// Lead status update body.
#[derive(Debug, Deserialize)]
pub struct UpdateLeadStatusBody {
    /// New status; transitions stamp `contacted_at`/`completed_at`.
    #[serde(default)]
    pub status: Option<LeadStatus>,
    /// New working notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// New quoted amount, dollars.
    #[serde(default)]
    pub quote_amount: Option<f64>,
    /// Whether the professional won the job.
    #[serde(default)]
    pub is_won: Option<bool>,
}

/// Update one of the caller's leads.
pub async fn update_lead_status(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Path(lead_id): Path<LeadId>,
    Json(body): Json<UpdateLeadStatusBody>,
) -> Result<Json<Lead>, ApiError> {
    let mut lead = state
        .store
        .get_lead(&lead_id)?
        .filter(|lead| lead.professional_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Lead not found".into()))?;

    if let Some(status) = body.status {
        lead.set_status(status);
    }
    if let Some(notes) = body.notes {
        lead.notes = notes;
    }
    if let Some(quote_amount) = body.quote_amount {
        lead.quote_amount = Some(quote_amount);
    }
    if let Some(is_won) = body.is_won {
        lead.is_won = Some(is_won);
    }
    lead.updated_at = chrono::Utc::now();

    state.store.put_lead(&lead)?;

    Ok(Json(lead))
}

/// Profile search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchProfilesQuery {
    /// Filter by service category.
    #[serde(default)]
    pub service_category: Option<ServiceCategory>,
    /// Case-insensitive city substring match.
    #[serde(default)]
    pub city: Option<String>,
    /// Case-insensitive province substring match.
    #[serde(default)]
    pub province: Option<String>,
    /// Show only verified professionals.
    #[serde(default)]
    pub is_verified: Option<bool>,
    /// Number of records to skip (default: 0).
    #[serde(default)]
    pub skip: usize,
    /// Number of records to return (default: 20, max: 100).
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    20
}

/// Search business profiles, featured and highest-rated first. Public.
pub async fn search_professionals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchProfilesQuery>,
) -> Result<Json<Vec<BusinessProfile>>, ApiError> {
    let filter = ProfileFilter {
        service_category: query.service_category,
        city: query.city,
        province: query.province,
        is_verified: query.is_verified,
    };

    let profiles = state
        .store
        .search_profiles(&filter, query.limit.min(100), query.skip)?;

    Ok(Json(profiles))
}

/// Get a professional's public profile.
pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(professional_id): Path<UserId>,
) -> Result<Json<BusinessProfile>, ApiError> {
    let profile = state
        .store
        .get_profile(&professional_id)?
        .ok_or_else(|| ApiError::NotFound("Professional profile not found".into()))?;

    Ok(Json(profile))
}
