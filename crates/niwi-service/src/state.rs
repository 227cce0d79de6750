//! Application state.

use std::sync::Arc;

use niwi_store::RocksStore;

use crate::chat::ChatClient;
use crate::config::ServiceConfig;
use crate::stripe::StripeClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Stripe client for payments (optional).
    pub stripe: Option<Arc<StripeClient>>,

    /// Chat relay client for the support assistant (optional).
    pub chat: Option<Arc<ChatClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        // Create Stripe client if configured
        let stripe = config.stripe_api_key.as_ref().map(|key| {
            tracing::info!("Stripe integration enabled");
            Arc::new(StripeClient::new(key, config.stripe_webhook_secret.clone()))
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - credit purchases will not be available");
        }

        // Create chat client if configured
        let chat = config.chat_api_key.as_ref().map(|key| {
            tracing::info!(model = %config.chat_model, "Chat assistant enabled");
            Arc::new(ChatClient::new(
                &config.chat_api_url,
                key,
                &config.chat_model,
            ))
        });

        if chat.is_none() {
            tracing::warn!("Chat API key not configured - the support assistant is disabled");
        }

        Self {
            store,
            config,
            stripe,
            chat,
        }
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }

    /// Check if the chat assistant is configured.
    #[must_use]
    pub fn has_chat(&self) -> bool {
        self.chat.is_some()
    }
}
