//! OpenAI-compatible chat completions client.

use reqwest::Client;
use std::time::Duration;

use niwi_core::{ChatMessage, ChatRole};

use super::types::{
    ChatErrorResponse, CompletionMessage, CompletionRequest, CompletionResponse,
};

/// Error type for chat relay operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat API returned an error.
    #[error("Chat API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The API returned no usable completion.
    #[error("Chat API returned an empty completion")]
    EmptyCompletion,
}

/// Client for an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL (e.g., `"https://api.openai.com/v1"`)
    /// * `api_key` - API key
    /// * `model` - Model name (e.g., `"gpt-4o"`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Request a completion for a session's conversation.
    ///
    /// The history is sent oldest first after the system prompt; the last
    /// entry is expected to be the user's new message.
    pub async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChatError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(CompletionMessage {
            role: "system",
            content: system_prompt.to_string(),
        });
        for message in history {
            messages.push(CompletionMessage {
                role: match message.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                content: message.content.clone(),
            });
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ChatErrorResponse>()
                .await
                .map_or_else(|_| format!("HTTP {status}"), |e| e.error.message);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ChatError::EmptyCompletion)
    }
}
