//! Payment session types.
//!
//! A payment session correlates one checkout attempt with its eventual
//! outcome. The session is created when the checkout is initiated and
//! advances to `Completed` or `Expired` exactly once; crediting the account
//! is keyed to that single transition so webhook delivery and status polling
//! can race safely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CreditPackage, UserId};

/// A checkout session tracked from initiation to its terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Checkout provider session id (e.g. `cs_test_...`).
    pub session_id: String,

    /// The purchasing user.
    pub user_id: UserId,

    /// The package being bought.
    pub package: CreditPackage,

    /// Amount charged in cents.
    pub amount_cents: i64,

    /// Credits granted on completion.
    pub credits_purchased: i64,

    /// Current status.
    pub status: PaymentSessionStatus,

    /// When the session was created.
    pub created_at: DateTime<Utc>,

    /// When the session was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PaymentSession {
    /// Create a freshly initiated session for a package purchase.
    #[must_use]
    pub fn initiated(session_id: String, user_id: UserId, package: CreditPackage) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            user_id,
            package,
            amount_cents: package.price_cents(),
            credits_purchased: package.credits(),
            status: PaymentSessionStatus::Initiated,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lifecycle status of a payment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    /// Checkout session created, user not yet redirected back.
    Initiated,

    /// Provider reports the payment as still in flight.
    Pending,

    /// Payment settled; credits have been granted.
    Completed,

    /// Checkout session expired without payment.
    Expired,
}

impl PaymentSessionStatus {
    /// Terminal statuses admit no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }
}
