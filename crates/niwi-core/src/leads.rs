//! Lead assignment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LeadId, RequestId, UserId};

/// Lifecycle status shared by customer requests and lead assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum LeadStatus {
    Pending,
    Assigned,
    Contacted,
    InProgress,
    Completed,
    Cancelled,
}

/// A customer request assigned to one professional.
///
/// The same request may be assigned to several professionals, each getting
/// their own lead record. Unlocking the customer's contact details costs the
/// professional one credit; the unlock itself is tracked by the store, not
/// on this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Unique lead id.
    pub id: LeadId,

    /// The underlying customer request.
    pub customer_request_id: RequestId,

    /// The professional this lead was assigned to.
    pub professional_id: UserId,

    /// Current status.
    pub status: LeadStatus,

    /// When the lead was assigned.
    pub assigned_at: DateTime<Utc>,

    /// When the professional first contacted the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacted_at: Option<DateTime<Utc>>,

    /// When the job was completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Professional's working notes.
    pub notes: String,

    /// Quoted amount, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_amount: Option<f64>,

    /// Whether the professional won the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_won: Option<bool>,

    /// When the lead record was created.
    pub created_at: DateTime<Utc>,

    /// When the lead record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Create a fresh assignment of a request to a professional.
    #[must_use]
    pub fn assign(customer_request_id: RequestId, professional_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: LeadId::generate(),
            customer_request_id,
            professional_id,
            status: LeadStatus::Assigned,
            assigned_at: now,
            contacted_at: None,
            completed_at: None,
            notes: String::new(),
            quote_amount: None,
            is_won: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to a new status, stamping the matching timestamp.
    pub fn set_status(&mut self, status: LeadStatus) {
        let now = Utc::now();
        match status {
            LeadStatus::Contacted if self.contacted_at.is_none() => {
                self.contacted_at = Some(now);
            }
            LeadStatus::Completed if self.completed_at.is_none() => {
                self.completed_at = Some(now);
            }
            _ => {}
        }
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_starts_assigned() {
        let lead = Lead::assign(RequestId::generate(), UserId::generate());
        assert_eq!(lead.status, LeadStatus::Assigned);
        assert!(lead.contacted_at.is_none());
        assert!(lead.completed_at.is_none());
    }

    #[test]
    fn contacted_stamps_timestamp_once() {
        let mut lead = Lead::assign(RequestId::generate(), UserId::generate());

        lead.set_status(LeadStatus::Contacted);
        let first = lead.contacted_at.expect("stamped");

        lead.set_status(LeadStatus::Contacted);
        assert_eq!(lead.contacted_at, Some(first));
    }

    #[test]
    fn completed_stamps_timestamp() {
        let mut lead = Lead::assign(RequestId::generate(), UserId::generate());
        lead.set_status(LeadStatus::Completed);
        assert!(lead.completed_at.is_some());
        assert_eq!(lead.status, LeadStatus::Completed);
    }
}
