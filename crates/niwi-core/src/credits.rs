//! Credit transaction types.
//!
//! Every change to an account balance creates a transaction record. The
//! record carries the balance after the change so history listings never
//! need to replay earlier entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{LeadId, TransactionId, UserId};

/// A credit transaction representing a balance change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// Unique transaction id (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Amount in whole credits. Positive = credit, negative = debit.
    pub amount: i64,

    /// Type of transaction.
    pub transaction_type: TransactionType,

    /// Balance after this transaction.
    pub balance_after: i64,

    /// Human-readable description.
    pub description: String,

    /// The lead unlocked, for `LeadUnlock` transactions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,

    /// The checkout session that funded a `Purchase`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_session_id: Option<String>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl CreditTransaction {
    /// Create a purchase transaction funded by a checkout session.
    #[must_use]
    pub fn purchase(
        user_id: UserId,
        amount: i64,
        balance_after: i64,
        description: String,
        payment_session_id: String,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::Purchase,
            balance_after,
            description,
            lead_id: None,
            payment_session_id: Some(payment_session_id),
            created_at: Utc::now(),
        }
    }

    /// Create a lead-unlock transaction (always a debit).
    #[must_use]
    pub fn lead_unlock(user_id: UserId, amount: i64, balance_after: i64, lead_id: LeadId) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount: -amount.abs(),
            transaction_type: TransactionType::LeadUnlock,
            balance_after,
            description: format!("Used {} credit(s) to view lead", amount.abs()),
            lead_id: Some(lead_id),
            payment_session_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a manual adjustment (admin grant or correction).
    #[must_use]
    pub fn adjustment(user_id: UserId, amount: i64, balance_after: i64, reason: String) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::Adjustment,
            balance_after,
            description: reason,
            lead_id: None,
            payment_session_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Type of credit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Credits bought through a checkout session.
    Purchase,

    /// One credit spent to unlock a lead's contact details.
    LeadUnlock,

    /// Manual admin grant or correction.
    Adjustment,
}

impl TransactionType {
    /// Wire name of the transaction type (the serde representation).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::LeadUnlock => "lead_unlock",
            Self::Adjustment => "adjustment",
        }
    }

    /// Check if this transaction type can add credits.
    #[must_use]
    pub const fn is_credit(&self) -> bool {
        matches!(self, Self::Purchase | Self::Adjustment)
    }

    /// Check if this transaction type removes credits.
    #[must_use]
    pub const fn is_debit(&self) -> bool {
        matches!(self, Self::LeadUnlock)
    }
}
