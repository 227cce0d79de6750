//! `RocksDB` storage layer for the Niwi marketplace platform.
//!
//! This crate provides persistent storage for credit accounts, transactions,
//! payment sessions, customer requests, leads, business profiles, and chat
//! history using `RocksDB` with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `accounts`: credit accounts, keyed by `user_id`
//! - `transactions`: credit transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: index for listing transactions by user
//! - `payment_sessions`: checkout sessions, keyed by provider session id
//! - `requests`: customer requests, keyed by `request_id`
//! - `leads`: lead assignments, keyed by `lead_id`
//! - `leads_by_professional`: index for listing a professional's leads
//! - `lead_unlocks`: records of credits spent on leads (idempotency)
//! - `profiles`: business profiles, keyed by `user_id`
//! - `chat_messages`: chat history, keyed by `session_id || ulid`
//!
//! # Example
//!
//! ```no_run
//! use niwi_store::{RocksStore, Store};
//! use niwi_core::{CreditAccount, UserId};
//!
//! let store = RocksStore::open("/tmp/niwi-db").unwrap();
//!
//! let user_id = UserId::generate();
//! let account = CreditAccount::new(user_id);
//! store.put_account(&account).unwrap();
//!
//! let retrieved = store.get_account(&user_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use niwi_core::{
    BusinessProfile, ChatMessage, CreditAccount, CreditTransaction, CustomerRequest, Lead, LeadId,
    LeadPriority, LeadStatus, PaymentSession, RequestId, ServiceCategory, TransactionId, UserId,
};

/// Result of crediting a completed payment session.
///
/// `newly_completed` is false when the session had already been credited by
/// an earlier webhook or status poll; callers must not grant credits again.
#[derive(Debug, Clone, Copy)]
pub struct PaymentCompletion {
    /// Credits granted by this session.
    pub credits_added: i64,
    /// Balance after completion.
    pub new_balance: i64,
    /// Whether this call performed the grant.
    pub newly_completed: bool,
}

/// Result of spending a credit on a lead.
///
/// `newly_unlocked` is false when the professional had already paid for this
/// lead; no second deduction happens in that case.
#[derive(Debug, Clone, Copy)]
pub struct LeadUnlock {
    /// Balance after the operation.
    pub balance: i64,
    /// Whether a credit was actually deducted.
    pub newly_unlocked: bool,
}

/// Filters for admin request listings.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Only requests in this status.
    pub status: Option<LeadStatus>,
    /// Only requests in this category.
    pub service_category: Option<ServiceCategory>,
    /// Only requests at this urgency.
    pub urgency: Option<LeadPriority>,
}

/// Filters for admin lead listings.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Only leads in this status.
    pub status: Option<LeadStatus>,
    /// Only leads assigned to this professional.
    pub professional_id: Option<UserId>,
}

/// Filters for profile search.
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    /// Only profiles offering this category.
    pub service_category: Option<ServiceCategory>,
    /// Case-insensitive city substring match.
    pub city: Option<String>,
    /// Case-insensitive province substring match.
    pub province: Option<String>,
    /// Only profiles with this verification state.
    pub is_verified: Option<bool>,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct PlatformStats {
    /// Total customer requests.
    pub total_requests: u64,
    /// Requests awaiting assignment.
    pub pending_requests: u64,
    /// Total lead assignments.
    pub total_leads: u64,
    /// Leads in assigned/contacted/in-progress states.
    pub active_leads: u64,
    /// Total business profiles.
    pub total_profiles: u64,
    /// Admin-verified profiles.
    pub verified_profiles: u64,
    /// Total credit accounts.
    pub total_accounts: u64,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations. It is the single mutation interface for all owned
/// collections; handlers never hold ambient mutable state.
pub trait Store: Send + Sync {
    // =========================================================================
    // Account Operations
    // =========================================================================

    /// Insert or update a credit account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_account(&self, account: &CreditAccount) -> Result<()>;

    /// Get a credit account by user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, user_id: &UserId) -> Result<Option<CreditAccount>>;

    /// Add credits to an account and record the transaction atomically.
    ///
    /// Creates the account if it does not exist yet. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn add_credits(
        &self,
        user_id: &UserId,
        amount: i64,
        transaction: &CreditTransaction,
    ) -> Result<i64>;

    /// Spend one credit to unlock a lead, atomically.
    ///
    /// If the professional already unlocked this lead, no credit is deducted
    /// and `newly_unlocked` is false.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the account doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is too low.
    fn unlock_lead(
        &self,
        user_id: &UserId,
        lead_id: &LeadId,
        transaction: &CreditTransaction,
    ) -> Result<LeadUnlock>;

    /// Check whether a professional has already unlocked a lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn is_lead_unlocked(&self, user_id: &UserId, lead_id: &LeadId) -> Result<bool>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Insert a credit transaction, maintaining the user index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_transaction(&self, transaction: &CreditTransaction) -> Result<()>;

    /// Get a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CreditTransaction>>;

    /// List transactions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>>;

    // =========================================================================
    // Payment Session Operations
    // =========================================================================

    /// Insert or update a payment session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_payment_session(&self, session: &PaymentSession) -> Result<()>;

    /// Get a payment session by provider session id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_payment_session(&self, session_id: &str) -> Result<Option<PaymentSession>>;

    /// Mark a session completed and grant its credits, exactly once.
    ///
    /// Webhook delivery and status polling both call this; only the first
    /// caller performs the grant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the session doesn't exist.
    fn complete_payment_session(&self, session_id: &str) -> Result<PaymentCompletion>;

    // =========================================================================
    // Customer Request Operations
    // =========================================================================

    /// Insert or update a customer request.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_request(&self, request: &CustomerRequest) -> Result<()>;

    /// Get a customer request by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_request(&self, request_id: &RequestId) -> Result<Option<CustomerRequest>>;

    /// Delete a customer request.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the request doesn't exist.
    fn delete_request(&self, request_id: &RequestId) -> Result<()>;

    /// List a customer's requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_requests_by_customer(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> Result<Vec<CustomerRequest>>;

    /// List requests matching the filter, newest first (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_requests(&self, filter: &RequestFilter, limit: usize) -> Result<Vec<CustomerRequest>>;

    // =========================================================================
    // Lead Operations
    // =========================================================================

    /// Insert or update a lead, maintaining the professional index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_lead(&self, lead: &Lead) -> Result<()>;

    /// Get a lead by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_lead(&self, lead_id: &LeadId) -> Result<Option<Lead>>;

    /// Delete a lead and its index entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the lead doesn't exist.
    fn delete_lead(&self, lead_id: &LeadId) -> Result<()>;

    /// List a professional's leads, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_leads_by_professional(
        &self,
        professional_id: &UserId,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>>;

    /// List leads matching the filter, newest first (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_leads(&self, filter: &LeadFilter, limit: usize) -> Result<Vec<Lead>>;

    /// Find an existing assignment of a request to a professional.
    ///
    /// Used to guard against assigning the same request twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_lead_for_request(
        &self,
        request_id: &RequestId,
        professional_id: &UserId,
    ) -> Result<Option<Lead>>;

    /// Count how many assignments a request currently has.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_leads_for_request(&self, request_id: &RequestId) -> Result<usize>;

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Insert or update a business profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_profile(&self, profile: &BusinessProfile) -> Result<()>;

    /// Get a business profile by owning user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, user_id: &UserId) -> Result<Option<BusinessProfile>>;

    /// Search profiles, featured and highest-rated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn search_profiles(
        &self,
        filter: &ProfileFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BusinessProfile>>;

    // =========================================================================
    // Chat Operations
    // =========================================================================

    /// Append a chat message to its session history.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_chat_message(&self, message: &ChatMessage) -> Result<()>;

    /// List the most recent messages of a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_chat_messages(&self, session_id: &str, limit: usize) -> Result<Vec<ChatMessage>>;

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Compute platform-wide counts for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn platform_stats(&self) -> Result<PlatformStats>;
}
