//! Core types and utilities for the Niwi marketplace platform.
//!
//! This crate provides the foundational types shared by the service, store,
//! and client crates:
//!
//! - **Identifiers**: `UserId`, `TransactionId`, `RequestId`, `LeadId`
//! - **Credits**: `CreditAccount`, `CreditTransaction`, `TransactionType`
//! - **Packages**: `CreditPackage` (the six purchasable lead-credit tiers)
//! - **Payments**: `PaymentSession`, `PaymentSessionStatus`
//! - **Marketplace**: `CustomerRequest`, `Lead`, `BusinessProfile`
//!
//! # Credit unit
//!
//! **1 credit = 1 lead unlock.**
//!
//! Credits are whole units, not cents. A professional buys a package
//! (e.g. 25 credits for $499) and spends exactly one credit to unlock the
//! full contact details of one lead. Balances are stored as `i64`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod chat;
pub mod credits;
pub mod ids;
pub mod leads;
pub mod packages;
pub mod payment;
pub mod profiles;
pub mod requests;

pub use account::CreditAccount;
pub use chat::{ChatMessage, ChatRole};
pub use credits::{CreditTransaction, TransactionType};
pub use ids::{IdError, LeadId, RequestId, TransactionId, UserId};
pub use leads::{Lead, LeadStatus};
pub use packages::CreditPackage;
pub use payment::{PaymentSession, PaymentSessionStatus};
pub use profiles::BusinessProfile;
pub use requests::{CustomerRequest, LeadPriority, ServiceCategory};
