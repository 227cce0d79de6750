//! Niwi API wire types.

use serde::{Deserialize, Serialize};

use niwi_core::{CreditPackage, LeadId, LeadPriority, ServiceCategory};

/// Response from the payment-status endpoint.
///
/// `credits_added` and `new_balance` are only present once the payment has
/// settled; while the provider still reports the payment in flight both are
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    /// Provider payment status: `"paid"`, `"expired"`, or `"pending"`.
    pub payment_status: String,
    /// Credits granted by this session, once paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_added: Option<i64>,
    /// Account balance after the grant, once paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<i64>,
}

/// Credit balance response.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Current spendable balance in whole credits.
    pub balance: i64,
    /// Lifetime credits purchased.
    pub total_purchased: i64,
    /// Lifetime credits spent.
    pub total_used: i64,
}

/// One entry of the package catalog.
#[derive(Debug, Clone, Deserialize)]
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
#[derive(Debug, Clone, Deserialize)]
pub struct PackagesResponse {
    /// Available packages, cheapest first.
    pub packages: Vec<PackageInfo>,
}

/// One entry of the transaction history.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    /// Transaction id.
    pub id: String,
    /// Amount in whole credits (positive = credit, negative = debit).
    pub amount: i64,
    /// Transaction type.
    pub transaction_type: String,
    /// Balance after this transaction.
    pub balance_after: i64,
    /// Description.
    pub description: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// Transaction history response.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsResponse {
    /// Transactions, newest first.
    pub transactions: Vec<TransactionRecord>,
    /// Whether more transactions exist past this page.
    pub has_more: bool,
}

/// Request body for spending a credit on a lead.
#[derive(Debug, Clone, Serialize)]
pub struct DeductCreditRequest {
    /// The lead to unlock.
    pub lead_id: LeadId,
}

/// Response after spending a credit on a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductCreditResponse {
    /// Balance after the operation.
    pub new_balance: i64,
    /// False when the lead was already unlocked and nothing was charged.
    pub newly_unlocked: bool,
}

/// Request body for the support assistant.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSendRequest {
    /// Message text.
    pub message: String,
    /// Existing session to continue, or absent to start a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Assistant reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSendResponse {
    /// Assistant message text.
    pub message: String,
    /// The session this exchange belongs to.
    pub session_id: String,
    /// Whether the server created a new session for this exchange.
    pub is_new_session: bool,
}

/// Landing-page quick request intake.
///
/// Quick requests need no account; the server keys them to a synthetic
/// guest id derived from the email.
#[derive(Debug, Clone, Serialize)]
pub struct QuickRequestInput {
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
    /// Free-form location; defaults server-side to "{city}, {province}".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Budget range lower bound, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,
    /// Budget range upper bound, dollars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,
    /// Timeline; defaults server-side to "ASAP".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    /// Urgency; defaults server-side to medium.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<LeadPriority>,
    /// Preferred contact channel; defaults server-side to "either".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_preference: Option<String>,
}

/// API error response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Structured detail, where the code defines one.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
