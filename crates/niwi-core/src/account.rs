//! Credit account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A professional's credit account.
///
/// The account tracks the spendable balance plus lifetime totals. Accounts
/// are created lazily on first balance read or first credit grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditAccount {
    /// The owning user.
    pub user_id: UserId,

    /// Current spendable balance in whole credits.
    pub balance: i64,

    /// Lifetime credits purchased.
    pub total_purchased: i64,

    /// Lifetime credits spent on lead unlocks.
    pub total_used: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CreditAccount {
    /// Create a new account with zero balance.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            balance: 0,
            total_purchased: 0,
            total_used: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the account can cover a deduction.
    #[must_use]
    pub fn has_sufficient_credits(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}
