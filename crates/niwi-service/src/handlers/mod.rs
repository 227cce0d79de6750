//! API handlers.

// Allow precision loss in handlers - displayed dollar amounts are well within f64 precision
#![allow(clippy::cast_precision_loss)]

pub mod admin;
pub mod chat;
pub mod credits;
pub mod customers;
pub mod health;
pub mod professionals;
pub mod webhooks;
