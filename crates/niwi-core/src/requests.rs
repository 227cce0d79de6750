//! Customer service-request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LeadStatus, RequestId};

/// Service categories a request or business profile can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ServiceCategory {
    Contractor,
    RealEstate,
    MortgageBroker,
    Plumber,
    Electrician,
    Hvac,
    Roofing,
    Landscaping,
    Cleaning,
    Handyman,
    Painter,
    Flooring,
}

/// How urgently a customer needs the work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum LeadPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// A customer's request for service.
///
/// Requests start `Pending` and become `Assigned` once an admin routes them
/// to one or more professionals as leads. Customers may only edit or delete
/// a request while it is still pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRequest {
    /// Unique request id.
    pub id: RequestId,

    /// The requesting customer. Guest requests from the landing page use a
    /// synthetic `guest_<email>` id, so this stays a plain string.
    pub customer_id: String,

    /// Category of service needed.
    pub service_category: ServiceCategory,

    /// Short title.
    pub title: String,

    /// Full description of the work.
    pub description: String,

    /// Free-form location (street, neighbourhood).
    pub location: String,

    /// City.
    pub city: String,

    /// Province.
    pub province: String,

    /// Budget range lower bound, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,

    /// Budget range upper bound, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,

    /// Timeline, e.g. "ASAP" or "Within 1 month".
    pub timeline: String,

    /// Urgency level.
    pub urgency: LeadPriority,

    /// Preferred contact channel: "phone", "email", or "either".
    pub contact_preference: String,

    /// Property type, where relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    /// Square footage, where relevant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<u32>,

    /// Additional structured details (guest contact info lands here).
    #[serde(default)]
    pub additional_details: serde_json::Value,

    /// Assignment status, shared with the lead lifecycle.
    pub status: LeadStatus,

    /// When the request was created.
    pub created_at: DateTime<Utc>,

    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CustomerRequest {
    /// Whether the request can still be edited or deleted by the customer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == LeadStatus::Pending
    }
}
