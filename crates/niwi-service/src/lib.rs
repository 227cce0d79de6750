//! Niwi HTTP API Service.
//!
//! This crate provides the HTTP API for the Niwi marketplace platform,
//! including:
//!
//! - Credit balance, packages, purchase, and the payment-status poll target
//! - Customer request intake and management
//! - Professional profiles and lead workflows
//! - Admin lead assignment and platform stats
//! - Support assistant chat relay
//! - Stripe webhooks
//!
//! # Authentication
//!
//! End-user requests carry HS256 JWTs minted by the auth service (claims:
//! `sub`, `user_id`, `user_type`). The `/api/customers/requests/quick` and
//! `/api/chat/send` endpoints also accept anonymous callers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async only for routing consistency

pub mod auth;
pub mod chat;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod stripe;

pub use chat::ChatClient;
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
