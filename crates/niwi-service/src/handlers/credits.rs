//! Credit balance, purchase, and payment confirmation handlers.
//!
//! `check_payment_status` is the poll target of the client-side payment
//! confirmation workflow: the checkout return page hits it until the
//! session settles. Crediting the account is keyed to the session's single
//! transition to `Completed`, so polling and webhook delivery can race
//! without double-granting.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use niwi_core::{
    CreditAccount, CreditPackage, CreditTransaction, LeadId, PaymentSession,
    PaymentSessionStatus,
};
use niwi_store::Store;

use crate::auth::Professional;
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current spendable balance in whole credits.
    pub balance: i64,
    /// Lifetime credits purchased.
    pub total_purchased: i64,
    /// Lifetime credits spent on lead unlocks.
    pub total_used: i64,
}

/// Get the current credit balance, creating the account on first read.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
) -> Result<Json<BalanceResponse>, ApiError> {
    let account = match state.store.get_account(&auth.user_id)? {
        Some(account) => account,
        None => {
            let account = CreditAccount::new(auth.user_id);
            state.store.put_account(&account)?;
            account
        }
    };

    Ok(Json(BalanceResponse {
        balance: account.balance,
        total_purchased: account.total_purchased,
        total_used: account.total_used,
    }))
}

/// One entry of the package catalog.
#[derive(Debug, Serialize)]
pub struct PackageInfo {
    /// Package tier.
    pub package_type: CreditPackage,
    /// Credits granted.
    pub credits: i64,
    /// Price in dollars.
    pub price: f64,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Price per credit in dollars.
    pub price_per_credit: f64,
    /// Hosted checkout page for this tier.
    pub checkout_url: String,
}

/// Package catalog response.
#[derive(Debug, Serialize)]
pub struct PackagesResponse {
    /// Available packages, cheapest first.
    pub packages: Vec<PackageInfo>,
}

/// Get the credit package catalog.
pub async fn get_packages() -> Json<PackagesResponse> {
    let packages = CreditPackage::ALL
        .into_iter()
        .map(|package| PackageInfo {
            package_type: package,
            credits: package.credits(),
            price: package.price_cents() as f64 / 100.0,
            name: package.name().to_string(),
            description: package.description().to_string(),
            price_per_credit: package.price_per_credit_cents() as f64 / 100.0,
            checkout_url: package.checkout_url().to_string(),
        })
        .collect();

    Json(PackagesResponse { packages })
}

/// Purchase credits request.
#[derive(Debug, Deserialize)]
pub struct PurchaseCreditsRequest {
    /// The package tier to buy.
    pub package_type: CreditPackage,
    /// Frontend origin to build the redirect URLs from; defaults to the
    /// configured frontend URL.
    #[serde(default)]
    pub origin_url: Option<String>,
}

/// Purchase credits response.
#[derive(Debug, Serialize)]
pub struct PurchaseCreditsResponse {
    /// Stripe checkout session URL.
    pub checkout_url: String,
    /// Session ID for the confirmation poll.
    pub session_id: String,
}

/// Initiate a credit purchase via Stripe Checkout.
pub async fn purchase_credits(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Json(body): Json<PurchaseCreditsRequest>,
) -> Result<Json<PurchaseCreditsResponse>, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payment system not configured".into()))?;

    let package = body.package_type;
    let origin = body
        .origin_url
        .unwrap_or_else(|| state.config.frontend_url.clone());
    let origin = origin.trim_end_matches('/');

    // The hosted page substitutes the placeholder with the real session id,
    // which the return page's poller extracts from the query string.
    let success_url = format!("{origin}/credits/success?session_id={{CHECKOUT_SESSION_ID}}");
    let cancel_url = format!("{origin}/credits");

    tracing::info!(
        user_id = %auth.user_id,
        package = %package,
        amount_cents = %package.price_cents(),
        "Initiating credit purchase"
    );

    let session = stripe
        .create_checkout_session(
            &auth.user_id.to_string(),
            package,
            &success_url,
            &cancel_url,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create Stripe checkout session");
            ApiError::ExternalService(format!("Failed to create payment session: {e}"))
        })?;

    let checkout_url = session
        .url
        .clone()
        .ok_or_else(|| ApiError::ExternalService("Stripe returned no checkout URL".into()))?;

    state.store.put_payment_session(&PaymentSession::initiated(
        session.id.clone(),
        auth.user_id,
        package,
    ))?;

    tracing::info!(
        user_id = %auth.user_id,
        session_id = %session.id,
        "Stripe checkout session created"
    );

    Ok(Json(PurchaseCreditsResponse {
        checkout_url,
        session_id: session.id,
    }))
}

/// Payment status response - the poll target's answer.
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    /// Provider payment status: `"paid"`, `"expired"`, or `"pending"`.
    pub payment_status: String,
    /// Credits granted by this session, once paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_added: Option<i64>,
    /// Account balance after the grant, once paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<i64>,
}

/// Check a checkout session's status, crediting the account exactly once.
pub async fn check_payment_status(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Path(session_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let mut session = state
        .store
        .get_payment_session(&session_id)?
        .filter(|s| s.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Payment transaction not found".into()))?;

    // Already credited by an earlier poll or webhook delivery.
    if session.status == PaymentSessionStatus::Completed {
        let balance = state
            .store
            .get_account(&auth.user_id)?
            .map_or(0, |a| a.balance);
        return Ok(Json(PaymentStatusResponse {
            payment_status: "paid".into(),
            credits_added: Some(session.credits_purchased),
            new_balance: Some(balance),
        }));
    }

    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payment system not configured".into()))?;

    let checkout = stripe.get_checkout_session(&session_id).await.map_err(|e| {
        tracing::error!(error = %e, %session_id, "Failed to check payment status");
        ApiError::ExternalService(format!("Failed to check payment status: {e}"))
    })?;

    if checkout.status.as_deref() == Some("expired") {
        session.status = PaymentSessionStatus::Expired;
        session.updated_at = chrono::Utc::now();
        state.store.put_payment_session(&session)?;

        return Ok(Json(PaymentStatusResponse {
            payment_status: "expired".into(),
            credits_added: None,
            new_balance: None,
        }));
    }

    if checkout.payment_status.as_deref() == Some("paid") {
        let completion = state.store.complete_payment_session(&session_id)?;

        if completion.newly_completed {
            tracing::info!(
                user_id = %auth.user_id,
                %session_id,
                credits_added = %completion.credits_added,
                new_balance = %completion.new_balance,
                "Credits granted from payment confirmation poll"
            );
        }

        return Ok(Json(PaymentStatusResponse {
            payment_status: "paid".into(),
            credits_added: Some(completion.credits_added),
            new_balance: Some(completion.new_balance),
        }));
    }

    // Still in flight; the client keeps polling.
    session.status = PaymentSessionStatus::Pending;
    session.updated_at = chrono::Utc::now();
    state.store.put_payment_session(&session)?;

    Ok(Json(PaymentStatusResponse {
        payment_status: checkout
            .payment_status
            .unwrap_or_else(|| "pending".into()),
        credits_added: None,
        new_balance: None,
    }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Transaction response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// Amount in whole credits (positive = credit, negative = debit).
    pub amount: i64,
    /// Transaction type.
    pub transaction_type: String,
    /// Balance after this transaction.
    pub balance_after: i64,
    /// Description.
    pub description: String,
    /// Timestamp.
    pub created_at: String,
}

impl From<&CreditTransaction> for TransactionResponse {
    fn from(tx: &CreditTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            amount: tx.amount,
            transaction_type: tx.transaction_type.as_str().to_string(),
            balance_after: tx.balance_after,
            description: tx.description.clone(),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// List transactions response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions (newest first).
    pub transactions: Vec<TransactionResponse>,
    /// Whether there are more transactions.
    pub has_more: bool,
}

/// List transaction history.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let transactions =
        state
            .store
            .list_transactions_by_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}

/// Deduct credit request.
#[derive(Debug, Deserialize)]
pub struct DeductCreditRequest {
    /// The lead to unlock.
    pub lead_id: LeadId,
}

/// Deduct credit response.
#[derive(Debug, Serialize)]
pub struct DeductCreditResponse {
    /// Balance after the operation.
    pub new_balance: i64,
    /// False when the lead was already unlocked and nothing was charged.
    pub newly_unlocked: bool,
}

/// Spend one credit to unlock a lead's contact details.
pub async fn deduct_credit(
    State(state): State<Arc<AppState>>,
    Professional(auth): Professional,
    Json(body): Json<DeductCreditRequest>,
) -> Result<Json<DeductCreditResponse>, ApiError> {
    // The lead must exist and be assigned to the caller.
    state
        .store
        .get_lead(&body.lead_id)?
        .filter(|lead| lead.professional_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Lead not found".into()))?;

    let account = state
        .store
        .get_account(&auth.user_id)?
        .ok_or_else(|| ApiError::InsufficientCredits {
            balance: 0,
            required: 1,
        })?;

    let transaction =
        CreditTransaction::lead_unlock(auth.user_id, 1, account.balance - 1, body.lead_id);
    let outcome = state
        .store
        .unlock_lead(&auth.user_id, &body.lead_id, &transaction)?;

    if outcome.newly_unlocked {
        tracing::info!(
            user_id = %auth.user_id,
            lead_id = %body.lead_id,
            new_balance = %outcome.balance,
            "Credit spent on lead unlock"
        );
    }

    Ok(Json(DeductCreditResponse {
        new_balance: outcome.balance,
        newly_unlocked: outcome.newly_unlocked,
    }))
}
