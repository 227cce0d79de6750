//! Business profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ServiceCategory, UserId};

/// A professional's public business profile.
///
/// Profiles are keyed by the owning user; a professional has at most one.
/// Ratings and verification flags are maintained by admins and the review
/// pipeline, never by the profile owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// The owning professional.
    pub user_id: UserId,

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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    /// Whether proof of insurance has been checked.
    pub insurance_verified: bool,

    /// Business website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Business phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_phone: Option<String>,

    /// Street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// City.
    pub city: String,

    /// Province.
    pub province: String,

    /// Postal code.
    pub postal_code: String,

    /// Hourly rate range lower bound, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate_min: Option<f64>,

    /// Hourly rate range upper bound, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate_max: Option<f64>,

    /// Average review rating.
    pub rating: f64,

    /// Number of reviews received.
    pub review_count: u32,

    /// Featured placement in search results.
    pub is_featured: bool,

    /// Admin-verified badge.
    pub is_verified: bool,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BusinessProfile {
    /// Whether the profile serves the given category.
    #[must_use]
    pub fn offers(&self, category: ServiceCategory) -> bool {
        self.service_categories.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offers_checks_categories() {
        let now = Utc::now();
        let profile = BusinessProfile {
            user_id: UserId::generate(),
            business_name: "Acme Plumbing".into(),
            service_categories: vec![ServiceCategory::Plumber, ServiceCategory::Hvac],
            description: "Pipes and ducts".into(),
            service_areas: vec!["Toronto".into()],
            years_experience: 12,
            license_number: None,
            insurance_verified: false,
            website: None,
            business_phone: None,
            address: None,
            city: "Toronto".into(),
            province: "ON".into(),
            postal_code: "M5V 2T6".into(),
            hourly_rate_min: Some(90.0),
            hourly_rate_max: Some(140.0),
            rating: 0.0,
            review_count: 0,
            is_featured: false,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        assert!(profile.offers(ServiceCategory::Plumber));
        assert!(!profile.offers(ServiceCategory::Roofing));
    }
}
