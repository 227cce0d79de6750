//! Stripe integration for credit purchases.
//!
//! Stripe handles:
//! - Checkout sessions for package purchases
//! - Session status retrieval (the payment-status poll target reads it)
//! - Webhook signature verification

pub mod client;
pub mod types;

pub use client::StripeClient;
pub use client::StripeError;
pub use types::*;
