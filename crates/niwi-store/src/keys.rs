//! Key encoding utilities for `RocksDB`.
//!
//! Primary records use fixed-width binary ids. Index keys concatenate two
//! 16-byte ids so prefix iteration over the first id yields the second in
//! sorted order (ULIDs sort chronologically).

use niwi_core::{LeadId, RequestId, TransactionId, UserId};

/// Create an account key from a user id.
#[must_use]
pub fn account_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction id.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
///
/// Format: `user_id (16 bytes) || transaction_id (16 bytes)`.
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Prefix for iterating all transactions of a user.
#[must_use]
pub fn user_transactions_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the transaction id from a user-transaction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_transaction_id(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    TransactionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a payment session key from a provider session id.
#[must_use]
pub fn payment_session_key(session_id: &str) -> Vec<u8> {
    session_id.as_bytes().to_vec()
}

/// Create a request key from a request id.
#[must_use]
pub fn request_key(request_id: &RequestId) -> Vec<u8> {
    request_id.as_bytes().to_vec()
}

/// Create a lead key from a lead id.
#[must_use]
pub fn lead_key(lead_id: &LeadId) -> Vec<u8> {
    lead_id.as_bytes().to_vec()
}

/// Create a professional-lead index key.
///
/// Format: `professional_id (16 bytes) || lead_id (16 bytes)`.
#[must_use]
pub fn professional_lead_key(professional_id: &UserId, lead_id: &LeadId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(professional_id.as_bytes());
    key.extend_from_slice(lead_id.as_bytes());
    key
}

/// Prefix for iterating all leads of a professional.
#[must_use]
pub fn professional_leads_prefix(professional_id: &UserId) -> Vec<u8> {
    professional_id.as_bytes().to_vec()
}

/// Extract the lead id from a professional-lead index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_lead_id(key: &[u8]) -> LeadId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    LeadId::from_uuid(uuid::Uuid::from_bytes(bytes))
}

/// Create a lead-unlock record key.
///
/// Format: `user_id (16 bytes) || lead_id (16 bytes)`.
#[must_use]
pub fn lead_unlock_key(user_id: &UserId, lead_id: &LeadId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(lead_id.as_bytes());
    key
}

/// Create a profile key from a user id.
#[must_use]
pub fn profile_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a chat message key.
///
/// Format: `session_id bytes || ulid (16 bytes)`; the ULID suffix keeps
/// messages of one session in send order.
#[must_use]
pub fn chat_message_key(session_id: &str, message_ulid: &[u8; 16]) -> Vec<u8> {
    let mut key = Vec::with_capacity(session_id.len() + 16);
    key.extend_from_slice(session_id.as_bytes());
    key.extend_from_slice(message_ulid);
    key
}

/// Prefix for iterating all messages of a chat session.
#[must_use]
pub fn chat_session_prefix(session_id: &str) -> Vec<u8> {
    session_id.as_bytes().to_vec()
}
