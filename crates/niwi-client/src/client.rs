//! Niwi HTTP client implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use niwi_core::{CustomerRequest, LeadId};

use crate::checkout::session_from_return_url;
use crate::error::ClientError;
use crate::poller::{CancelToken, PaymentPoller, PaymentStatusSource, PollState};
use crate::presenter::{present, PaymentView};
use crate::types::{
    ApiErrorResponse, BalanceResponse, ChatSendRequest, ChatSendResponse, DeductCreditRequest,
    DeductCreditResponse, PackagesResponse, PaymentStatusResponse, QuickRequestInput,
    TransactionsResponse,
};

/// Niwi API client.
///
/// Carries an optional bearer token; endpoints that need a signed-in
/// professional fail with an API error when called without one.
#[derive(Debug, Clone)]
pub struct NiwiClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl NiwiClient {
    /// Create an unauthenticated client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the Niwi API (e.g., `"https://api.niwi.ca"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, None, ClientOptions::default())
    }

    /// Create a client with a bearer token.
    #[must_use]
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_options(base_url, Some(token.into()), ClientOptions::default())
    }

    /// Create a client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    /// Check the status of a checkout session.
    ///
    /// This is the poll target of the payment confirmation workflow; prefer
    /// [`NiwiClient::confirm_purchase`] which drives the bounded loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn payment_status(
        &self,
        session_id: &str,
    ) -> Result<PaymentStatusResponse, ClientError> {
        let url = format!("{}/api/credits/payment-status/{session_id}", self.base_url);
        let response = self.authed(self.client.get(&url)).send().await?;
        self.handle_response(response).await
    }

    /// Run the full payment confirmation workflow for a checkout return URL.
    ///
    /// Extracts the `session_id` from the URL, polls the status endpoint
    /// until a terminal state, and renders the result view. A missing token
    /// short-circuits to the error view with zero network calls. Cancelling
    /// the token abandons the loop; a cancelled workflow has no view.
    pub async fn confirm_purchase(
        &self,
        return_url: &str,
        cancel: &CancelToken,
    ) -> (PollState, Option<PaymentView>) {
        let session_id = session_from_return_url(return_url);
        let poller = PaymentPoller::new(self.clone());
        let state = poller.run(session_id.as_deref(), cancel).await;
        let view = present(&state);
        (state, view)
    }

    /// Get the current credit balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn balance(&self) -> Result<BalanceResponse, ClientError> {
        let url = format!("{}/api/credits/balance", self.base_url);
        let response = self.authed(self.client.get(&url)).send().await?;
        self.handle_response(response).await
    }

    /// Get the credit package catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn packages(&self) -> Result<PackagesResponse, ClientError> {
        let url = format!("{}/api/credits/packages", self.base_url);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// List credit transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn transactions(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<TransactionsResponse, ClientError> {
        let url = format!("{}/api/credits/transactions", self.base_url);
        let response = self
            .authed(self.client.get(&url))
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Spend one credit to unlock a lead's contact details.
    ///
    /// Unlocking a lead that was already paid for charges nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientCredits`] when the balance is too
    /// low, or another error if the request fails.
    pub async fn deduct_credit(
        &self,
        lead_id: LeadId,
    ) -> Result<DeductCreditResponse, ClientError> {
        let url = format!("{}/api/credits/deduct", self.base_url);
        let response = self
            .authed(self.client.post(&url))
            .json(&DeductCreditRequest { lead_id })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Send a message to the support assistant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn send_chat(
        &self,
        message: impl Into<String>,
        session_id: Option<&str>,
    ) -> Result<ChatSendResponse, ClientError> {
        let url = format!("{}/api/chat/send", self.base_url);
        let body = ChatSendRequest {
            message: message.into(),
            session_id: session_id.map(String::from),
        };
        let response = self.authed(self.client.post(&url)).json(&body).send().await?;
        self.handle_response(response).await
    }

    /// Create a landing-page quick request without an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_quick_request(
        &self,
        input: &QuickRequestInput,
    ) -> Result<CustomerRequest, ClientError> {
        let url = format!("{}/api/customers/requests/quick", self.base_url);
        let response = self.client.post(&url).json(input).send().await?;
        self.handle_response(response).await
    }

    /// Attach the bearer token when one is configured.
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header("authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                match code {
                    "insufficient_credits" => {
                        let balance = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("balance"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);
                        let required = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("required"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::InsufficientCredits { balance, required })
                    }
                    "not_found" => Err(ClientError::NotFound(message)),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl PaymentStatusSource for NiwiClient {
    async fn payment_status(
        &self,
        session_id: &str,
    ) -> Result<PaymentStatusResponse, ClientError> {
        NiwiClient::payment_status(self, session_id).await
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = NiwiClient::new("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.auth_token.is_none());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = NiwiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_with_token() {
        let client = NiwiClient::with_token("http://localhost:8080", "jwt-token");
        assert_eq!(client.auth_token.as_deref(), Some("jwt-token"));
    }
}
