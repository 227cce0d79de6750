//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{admin, chat, credits, customers, health, professionals, webhooks};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /api/health` - Health check
/// - `GET /api/credits/packages` - Package catalog
/// - `POST /api/customers/requests/quick` - Landing-page intake
/// - `GET /api/professionals` - Profile search
/// - `GET /api/professionals/{id}` - Public profile
/// - `POST /api/chat/send` - Support assistant
///
/// ## Credits (professional JWT auth)
/// - `GET /api/credits/balance` - Get current balance
/// - `POST /api/credits/purchase` - Initiate a package purchase
/// - `GET /api/credits/payment-status/{session_id}` - Confirmation poll target
/// - `GET /api/credits/transactions` - Transaction history
/// - `POST /api/credits/deduct` - Spend a credit on a lead
///
/// ## Customers (JWT auth)
/// - `POST/GET /api/customers/requests`, `GET/PUT/DELETE
///   /api/customers/requests/{id}`
///
/// ## Professionals (professional JWT auth)
/// - `POST/GET/PUT /api/professionals/profile`
/// - `GET /api/professionals/leads`, `PUT /api/professionals/leads/{id}/status`
///
/// ## Admin (admin JWT auth)
/// - `GET /api/admin/requests`, `POST/GET /api/admin/leads`,
///   `DELETE /api/admin/leads/{id}`,
///   `PUT /api/admin/profiles/{user_id}/verify`, `GET /api/admin/stats`
///
/// ## Webhooks (signature verification)
/// - `POST /api/webhooks/stripe` - Stripe webhooks
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    Router::new()
        // Health (public)
        .route("/api/health", get(health::health))
        // Credits
        .route("/api/credits/balance", get(credits::get_balance))
        .route("/api/credits/packages", get(credits::get_packages))
        .route("/api/credits/purchase", post(credits::purchase_credits))
        .route(
            "/api/credits/payment-status/:session_id",
            get(credits::check_payment_status),
        )
        .route(
            "/api/credits/transactions",
            get(credits::list_transactions),
        )
        .route("/api/credits/deduct", post(credits::deduct_credit))
        // Customers
        .route(
            "/api/customers/requests",
            post(customers::create_request).get(customers::list_my_requests),
        )
        .route(
            "/api/customers/requests/quick",
            post(customers::create_quick_request),
        )
        .route(
            "/api/customers/requests/:request_id",
            get(customers::get_request)
                .put(customers::update_request)
                .delete(customers::delete_request),
        )
        // Professionals
        .route(
            "/api/professionals/profile",
            post(professionals::create_profile)
                .get(professionals::get_my_profile)
                .put(professionals::update_my_profile),
        )
        .route(
            "/api/professionals/leads",
            get(professionals::list_my_leads),
        )
        .route(
            "/api/professionals/leads/:lead_id/status",
            put(professionals::update_lead_status),
        )
        .route("/api/professionals", get(professionals::search_professionals))
        .route(
            "/api/professionals/:professional_id",
            get(professionals::get_public_profile),
        )
        // Admin
        .route("/api/admin/requests", get(admin::list_requests))
        .route(
            "/api/admin/leads",
            post(admin::assign_lead).get(admin::list_leads),
        )
        .route("/api/admin/leads/:lead_id", delete(admin::delete_lead))
        .route(
            "/api/admin/profiles/:user_id/verify",
            put(admin::verify_profile),
        )
        .route("/api/admin/stats", get(admin::get_stats))
        // Chat
        .route("/api/chat/send", post(chat::send_message))
        // Webhooks
        .route("/api/webhooks/stripe", post(webhooks::stripe_webhook))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
