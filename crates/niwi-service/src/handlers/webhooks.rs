//! Stripe webhook handler.
//!
//! Webhook delivery and the payment-status poll both drive a session to its
//! terminal state; `Store::complete_payment_session` makes sure only the
//! first of them grants the credits.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use niwi_core::PaymentSessionStatus;
use niwi_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Stripe webhook payload (simplified).
#[derive(Debug, Deserialize)]
pub struct StripeWebhook {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event ID.
    pub id: String,
    /// Event data.
    pub data: StripeEventData,
}

/// Stripe event data container.
#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    /// Event object.
    pub object: serde_json::Value,
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the webhook was processed.
    pub received: bool,
}

/// Handle Stripe webhooks.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    // Verify signature if webhook_secret is configured
    if state.config.stripe_webhook_secret.is_some() {
        let sig =
            signature.ok_or_else(|| ApiError::BadRequest("Missing Stripe signature".into()))?;

        if let Some(stripe) = &state.stripe {
            stripe.verify_webhook_signature(&body, sig).map_err(|e| {
                tracing::warn!(error = %e, "Invalid Stripe webhook signature");
                ApiError::BadRequest("Invalid webhook signature".into())
            })?;
        } else {
            tracing::warn!(
                "Stripe webhook_secret configured but client not available - skipping verification"
            );
        }
    } else {
        // No webhook_secret configured - skip verification (development mode)
        tracing::warn!("Stripe webhook_secret not configured - skipping signature verification");
    }

    // Parse webhook payload
    let webhook: StripeWebhook =
        serde_json::from_str(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(
        event_type = %webhook.event_type,
        event_id = %webhook.id,
        "Received Stripe webhook"
    );

    match webhook.event_type.as_str() {
        "checkout.session.completed" => {
            handle_checkout_completed(&state, &webhook.data.object)?;
        }
        "checkout.session.expired" => {
            handle_checkout_expired(&state, &webhook.data.object)?;
        }
        _ => {
            tracing::debug!(event_type = %webhook.event_type, "Unhandled Stripe event");
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}

fn handle_checkout_completed(
    state: &AppState,
    data: &serde_json::Value,
) -> Result<(), ApiError> {
    let session_id = data
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("Missing session id".into()))?;

    let payment_status = data
        .get("payment_status")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    // Only process if payment is complete
    if payment_status != "paid" {
        tracing::info!(
            session_id,
            payment_status,
            "Checkout session not paid yet, skipping"
        );
        return Ok(());
    }

    // A webhook for a session we never initiated is not an error; Stripe
    // retries on non-2xx, so acknowledge and move on.
    if state.store.get_payment_session(session_id)?.is_none() {
        tracing::warn!(session_id, "Webhook for unknown payment session");
        return Ok(());
    }

    let completion = state.store.complete_payment_session(session_id)?;

    if completion.newly_completed {
        tracing::info!(
            session_id,
            credits_added = %completion.credits_added,
            new_balance = %completion.new_balance,
            "Credits granted from Stripe webhook"
        );
    } else {
        tracing::info!(session_id, "Payment session already credited, skipping");
    }

    Ok(())
}

fn handle_checkout_expired(state: &AppState, data: &serde_json::Value) -> Result<(), ApiError> {
    let session_id = data
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::BadRequest("Missing session id".into()))?;

    let Some(mut session) = state.store.get_payment_session(session_id)? else {
        tracing::warn!(session_id, "Expiry webhook for unknown payment session");
        return Ok(());
    };

    if session.status.is_terminal() {
        return Ok(());
    }

    session.status = PaymentSessionStatus::Expired;
    session.updated_at = chrono::Utc::now();
    state.store.put_payment_session(&session)?;

    tracing::info!(session_id, "Payment session expired");

    Ok(())
}
