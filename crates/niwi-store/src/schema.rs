//! Column family definitions.

/// Column family names.
pub mod cf {
    /// Credit accounts, keyed by `user_id` bytes.
    pub const ACCOUNTS: &str = "accounts";
    /// Credit transactions, keyed by ULID bytes.
    pub const TRANSACTIONS: &str = "transactions";
    /// Index: `user_id || transaction_id` -> empty.
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";
    /// Payment sessions, keyed by provider session id.
    pub const PAYMENT_SESSIONS: &str = "payment_sessions";
    /// Customer requests, keyed by `request_id` bytes.
    pub const REQUESTS: &str = "requests";
    /// Lead assignments, keyed by `lead_id` bytes.
    pub const LEADS: &str = "leads";
    /// Index: `professional_id || lead_id` -> empty.
    pub const LEADS_BY_PROFESSIONAL: &str = "leads_by_professional";
    /// Unlock records: `user_id || lead_id` -> empty.
    pub const LEAD_UNLOCKS: &str = "lead_unlocks";
    /// Business profiles, keyed by `user_id` bytes.
    pub const PROFILES: &str = "profiles";
    /// Chat history: `session_id || ulid` -> message.
    pub const CHAT_MESSAGES: &str = "chat_messages";
}

/// All column families, for database open.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::ACCOUNTS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::PAYMENT_SESSIONS,
        cf::REQUESTS,
        cf::LEADS,
        cf::LEADS_BY_PROFESSIONAL,
        cf::LEAD_UNLOCKS,
        cf::PROFILES,
        cf::CHAT_MESSAGES,
    ]
}
